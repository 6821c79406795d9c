// Domain layer: firearm simulation types and rules.

pub mod effects;
pub mod errors;
pub mod firearm;
pub mod hands;
pub mod magazine;
pub mod ports;
pub mod slide;
pub mod tuning;

pub use effects::Effect;
pub use errors::RigError;
pub use firearm::{FireResult, Firearm, FirearmId, FirearmState, Muzzle};
pub use hands::{GrabZone, HandId, HandProxy, Hands};
pub use magazine::{Magazine, MagazineId, MagazineStore};
pub use ports::Clock;
pub use slide::{SlideAssembly, SlideRail, SlideState, project_onto_rail};
pub use tuning::Tuning;
