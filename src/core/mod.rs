pub mod axis;
pub mod bar;
pub mod gesture;
pub mod primitives;
pub mod timeframe;
pub mod viewport;

pub use axis::{PriceMark, PriceMarkKind, TimeMark, price_marks, time_axis_mark, visible_time_marks};
pub use bar::{Bar, BarSeries};
pub use gesture::{Gesture, apply_gesture};
pub use timeframe::Timeframe;
pub use viewport::{
    CandleGeometry, MIN_VISIBLE_BARS, PriceExtrema, ViewportState, ViewportTuning, VisibleRange,
};
