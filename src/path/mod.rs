pub(crate) mod index;
pub(crate) mod polyline;
pub(crate) mod winding;
