mod victim;
mod victim_image;

pub use victim::{NewVictim, Victim, VictimFilter, VictimPatch};
pub use victim_image::VictimImage;
