//! Waypoint file loading
//!
//! One waypoint per line as `lat lon alt`, separated by whitespace or
//! commas. Blank lines and `#` comments are skipped.
//!
//! ```text
//! # survey leg
//! 51.4240, -2.6720, 120
//! 51.4250 -2.6730 130
//! ```

use std::path::Path;

use sortie_core::mission::MAX_WAYPOINTS;
use sortie_core::Waypoint;

use crate::error::LinkError;

/// Parse waypoint text; `path` is only used for error messages
pub fn parse_waypoints(path: &Path, text: &str) -> Result<Vec<Waypoint>, LinkError> {
    let mut waypoints = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .collect();

        let error = |reason: String| LinkError::WaypointParse {
            path: path.to_path_buf(),
            line: index + 1,
            reason,
        };

        let [lat, lon, alt] = fields.as_slice() else {
            return Err(error(format!(
                "expected 3 fields (lat lon alt), found {}",
                fields.len()
            )));
        };

        let latitude: f64 = lat
            .parse()
            .map_err(|_| error(format!("invalid latitude '{lat}'")))?;
        let longitude: f64 = lon
            .parse()
            .map_err(|_| error(format!("invalid longitude '{lon}'")))?;
        let altitude: f32 = alt
            .parse()
            .map_err(|_| error(format!("invalid altitude '{alt}'")))?;

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(error(format!("latitude {latitude} out of range")));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(error(format!("longitude {longitude} out of range")));
        }
        if !altitude.is_finite() {
            return Err(error(format!("altitude {altitude} is not finite")));
        }

        waypoints.push(Waypoint::new(latitude, longitude, altitude));
    }

    if waypoints.len() > MAX_WAYPOINTS {
        return Err(LinkError::WaypointOverflow {
            path: path.to_path_buf(),
            count: waypoints.len(),
        });
    }

    Ok(waypoints)
}

/// Read and parse a waypoint file
pub async fn load_waypoints(path: &Path) -> Result<Vec<Waypoint>, LinkError> {
    let text = tokio::fs::read_to_string(path).await?;
    parse_waypoints(path, &text)
}
