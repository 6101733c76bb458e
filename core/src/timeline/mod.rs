//! Tick-indexed data and the interval algebra used to turn detections into
//! highlight windows.

pub mod interval;
pub mod series;

pub use interval::{
    Interval, calculate_iou, convert_binary_mask_to_intervals, get_intersection,
    get_intersections, has_intersection, merge_close_intervals, total_duration,
};
pub use series::{Tick, TimeSeries, TimeTable, Timed};
