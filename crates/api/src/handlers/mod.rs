pub mod assets;
pub mod events;
pub mod notes;
pub mod results;
pub mod revisions;
