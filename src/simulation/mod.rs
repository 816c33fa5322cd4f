pub mod error;
pub mod states;
pub mod params;
pub mod engine;
pub mod forces;
pub mod octree;
pub mod integrator;
pub mod system;
pub mod scenario;
