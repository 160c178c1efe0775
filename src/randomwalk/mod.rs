pub mod gradient;
pub mod matrix;
pub mod params;
pub mod propagate;
pub mod seeds;
pub mod solver;
pub mod stack;
