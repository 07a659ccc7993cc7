//! Scenario tests over derived types.

mod construction;
mod extension_data;
mod policies;
mod references;
mod round_trip;
mod type_names;
