//! Static face geometry and hand-angle math
//!
//! All coordinates live in a fixed 100x100 viewbox with the pivot at
//! (50, 50); the rendered size only scales the viewbox.

use chrono::{NaiveDateTime, Timelike};

/// A line segment of the clock face, in viewbox coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// A numeral label on the clock face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberLabel {
    pub number: u8,
    pub x: f64,
    pub y: f64,
}

/// Hand segments in hour, minute, second order; the endpoint distance
/// from the pivot encodes the hand length
pub const HANDS: [Segment; 3] = [
    Segment { x1: 50.0, y1: 50.0, x2: 50.0, y2: 24.0 },
    Segment { x1: 50.0, y1: 50.0, x2: 50.0, y2: 20.0 },
    Segment { x1: 50.0, y1: 50.0, x2: 50.0, y2: 16.0 },
];

/// The four numeral labels (12, 3, 6, 9)
pub const NUMBERS: [NumberLabel; 4] = [
    NumberLabel { number: 12, x: 50.0, y: 18.0 },
    NumberLabel { number: 3, x: 85.0, y: 53.0 },
    NumberLabel { number: 6, x: 50.0, y: 88.0 },
    NumberLabel { number: 9, x: 15.0, y: 53.0 },
];

/// The twelve tick marks around the face
pub const TICKS: [Segment; 12] = [
    Segment { x1: 50.0, y1: 5.0, x2: 50.0, y2: 10.0 },
    Segment { x1: 72.5, y1: 11.03, x2: 70.0, y2: 15.36 },
    Segment { x1: 88.97, y1: 27.5, x2: 84.64, y2: 30.0 },
    Segment { x1: 95.0, y1: 50.0, x2: 90.0, y2: 50.0 },
    Segment { x1: 88.97, y1: 72.5, x2: 84.64, y2: 70.0 },
    Segment { x1: 72.5, y1: 88.97, x2: 70.0, y2: 84.64 },
    Segment { x1: 50.0, y1: 95.0, x2: 50.0, y2: 90.0 },
    Segment { x1: 27.5, y1: 88.97, x2: 30.0, y2: 84.64 },
    Segment { x1: 11.03, y1: 72.5, x2: 15.36, y2: 70.0 },
    Segment { x1: 5.0, y1: 50.0, x2: 10.0, y2: 50.0 },
    Segment { x1: 11.03, y1: 27.5, x2: 15.36, y2: 30.0 },
    Segment { x1: 27.5, y1: 11.03, x2: 30.0, y2: 15.36 },
];

/// Viewbox of the scalable face
pub const VIEWBOX: &str = "0 0 100 100";

/// Face circle center and radius, in viewbox coordinates
pub const FACE_CENTER: (f64, f64) = (50.0, 50.0);
pub const FACE_RADIUS: f64 = 45.0;

/// Pixel dimensions for the named sizes
pub const SIZE_SMALL: f64 = 100.0;
pub const SIZE_MEDIUM: f64 = 200.0;
pub const SIZE_LARGE: f64 = 300.0;

/// Rotation angles of the three hands, in degrees clockwise from 12
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandAngles {
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
}

/// Compute hand angles for a simulated time-of-day.
///
/// The hour hand moves continuously with the minutes (no stepping);
/// minute and second hands step once per tick.
pub fn hand_angles(time: &NaiveDateTime) -> HandAngles {
    let sec = time.second() as f64;
    let min = time.minute() as f64;
    let hour12 = (time.hour() % 12) as f64 + min / 60.0;

    HandAngles {
        hour: hour12 * 30.0,
        minute: min * 6.0,
        second: sec * 6.0,
    }
}

/// Render a rotation transform about the face pivot
pub fn rotate_transform(angle: f64) -> String {
    format!("rotate({} {} {})", angle, FACE_CENTER.0, FACE_CENTER.1)
}
