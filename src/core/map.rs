use crate::domain::model::{Coordinate, MapOptions, MapStyle};

/// Text rendered instead of a map when nothing was resolved.
pub const NO_PLACES_MESSAGE: &str = "No places to show. Check your .csv file.";

const GOOGLE_MAPS_SCRIPT: &str = "https://maps.googleapis.com/maps/api/js?v=3.exp";
const LEAFLET_VERSION: &str = "1.9.4";

/// A map page with one marker per point, centered on the mean of all points.
#[derive(Debug, Clone, Default)]
pub struct MapDocument {
    points: Vec<Coordinate>,
    options: MapOptions,
}

impl MapDocument {
    pub fn new(options: MapOptions) -> Self {
        Self {
            points: Vec::new(),
            options,
        }
    }

    pub fn add_point(&mut self, point: Coordinate) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Mean latitude and longitude, or `None` for an empty document.
    pub fn center(&self) -> Option<Coordinate> {
        if self.points.is_empty() {
            return None;
        }
        let n = self.points.len() as f64;
        let lat = self.points.iter().map(|p| p.lat).sum::<f64>() / n;
        let lon = self.points.iter().map(|p| p.lon).sum::<f64>() / n;
        Some(Coordinate::new(lat, lon))
    }

    /// Renders the complete HTML page.
    pub fn render(&self) -> String {
        let Some(center) = self.center() else {
            return NO_PLACES_MESSAGE.to_string();
        };

        match self.options.style {
            MapStyle::Google => self.render_google(center),
            MapStyle::Leaflet => self.render_leaflet(center),
        }
    }

    fn render_google(&self, center: Coordinate) -> String {
        let script_src = match &self.options.api_key {
            Some(key) => format!(
                "{}&key={}",
                GOOGLE_MAPS_SCRIPT,
                url::form_urlencoded::byte_serialize(key.as_bytes()).collect::<String>()
            ),
            None => GOOGLE_MAPS_SCRIPT.to_string(),
        };
        let markers = self
            .points
            .iter()
            .map(|p| {
                format!(
                    r#"      new google.maps.Marker({{
        position: new google.maps.LatLng({}, {}),
        map: map
      }});"#,
                    js_number(p.lat),
                    js_number(p.lon)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <script src="{script_src}"></script>
  </head>
  <body style="margin: 0">
    <div id="map-canvas" style="height: 100vh; width: 100%"></div>
    <script type="text/javascript">
      var map;
      function show_map() {{
        map = new google.maps.Map(document.getElementById("map-canvas"), {{
          zoom: {zoom},
          center: new google.maps.LatLng({lat}, {lon})
        }});
{markers}
      }}
      google.maps.event.addDomListener(window, 'load', show_map);
    </script>
  </body>
</html>
"#,
            script_src = script_src,
            zoom = self.options.zoom,
            lat = js_number(center.lat),
            lon = js_number(center.lon),
            markers = indent(&markers),
        )
    }

    fn render_leaflet(&self, center: Coordinate) -> String {
        let markers = self
            .points
            .iter()
            .map(|p| {
                format!(
                    "      L.marker([{}, {}]).addTo(map);",
                    js_number(p.lat),
                    js_number(p.lon)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <link rel="stylesheet" href="https://unpkg.com/leaflet@{version}/dist/leaflet.css">
    <script src="https://unpkg.com/leaflet@{version}/dist/leaflet.js"></script>
  </head>
  <body style="margin: 0">
    <div id="map-canvas" style="height: 100vh; width: 100%"></div>
    <script type="text/javascript">
      var map;
      function show_map() {{
        map = L.map("map-canvas").setView([{lat}, {lon}], {zoom});
        L.tileLayer("https://tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png", {{
          maxZoom: 19,
          attribution: "&copy; OpenStreetMap contributors"
        }}).addTo(map);
{markers}
      }}
      window.addEventListener("load", show_map);
    </script>
  </body>
</html>
"#,
            version = LEAFLET_VERSION,
            zoom = self.options.zoom,
            lat = js_number(center.lat),
            lon = js_number(center.lon),
            markers = indent(&markers),
        )
    }
}

/// Shortest representation that parses back to the same `f64`.
fn js_number(value: f64) -> String {
    format!("{:?}", value)
}

fn indent(block: &str) -> String {
    block
        .lines()
        .map(|line| format!("  {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn google() -> MapOptions {
        MapOptions {
            style: MapStyle::Google,
            ..MapOptions::default()
        }
    }

    #[test]
    fn test_empty_document_renders_fallback() {
        let doc = MapDocument::new(MapOptions::default());
        assert_eq!(doc.center(), None);
        assert_eq!(doc.render(), NO_PLACES_MESSAGE);
        assert_eq!(MapDocument::new(google()).render(), NO_PLACES_MESSAGE);
    }

    #[test]
    fn test_single_point_is_its_own_center() {
        let mut doc = MapDocument::new(google());
        doc.add_point(Coordinate::new(48.8566, 2.3522));

        assert_eq!(doc.center(), Some(Coordinate::new(48.8566, 2.3522)));

        let html = doc.render();
        assert_eq!(html.matches("new google.maps.Marker(").count(), 1);
        assert_eq!(html.matches("new google.maps.LatLng(48.8566, 2.3522)").count(), 2);
        assert!(html.contains("zoom: 8"));
    }

    #[test]
    fn test_center_is_mean_of_points() {
        let mut doc = MapDocument::new(MapOptions::default());
        doc.add_point(Coordinate::new(0.0, 0.0));
        doc.add_point(Coordinate::new(10.0, 10.0));

        assert_eq!(doc.center(), Some(Coordinate::new(5.0, 5.0)));
        assert!(doc.render().contains("setView([5.0, 5.0], 8)"));
    }

    #[test]
    fn test_add_point_keeps_duplicates_and_order() {
        let mut doc = MapDocument::new(MapOptions::default());
        doc.add_point(Coordinate::new(1.0, 2.0));
        doc.add_point(Coordinate::new(-3.5, 4.25));
        doc.add_point(Coordinate::new(1.0, 2.0));

        assert_eq!(doc.points().len(), 3);

        let html = doc.render();
        let first = html.find("L.marker([1.0, 2.0])").unwrap();
        let second = html.find("L.marker([-3.5, 4.25])").unwrap();
        assert!(first < second);
        assert_eq!(html.matches("L.marker(").count(), 3);
    }

    #[test]
    fn test_coordinates_are_not_rounded() {
        let mut doc = MapDocument::new(MapOptions::default());
        doc.add_point(Coordinate::new(0.1 + 0.2, 18.0685808));

        let html = doc.render();
        assert!(html.contains("L.marker([0.30000000000000004, 18.0685808])"));
    }

    #[test]
    fn test_out_of_range_coordinates_are_rendered_as_given() {
        let mut doc = MapDocument::new(MapOptions::default());
        doc.add_point(Coordinate::new(123.0, -400.5));
        assert!(doc.render().contains("L.marker([123.0, -400.5])"));
    }

    #[test]
    fn test_google_api_key_in_script_url() {
        let mut doc = MapDocument::new(MapOptions {
            api_key: Some("abc 123".to_string()),
            ..google()
        });
        doc.add_point(Coordinate::new(1.0, 1.0));
        assert!(doc
            .render()
            .contains("https://maps.googleapis.com/maps/api/js?v=3.exp&key=abc+123"));
    }

    #[test]
    fn test_render_is_repeatable() {
        let mut doc = MapDocument::new(MapOptions::default());
        doc.add_point(Coordinate::new(52.52, 13.405));
        assert_eq!(doc.render(), doc.render());
    }
}
