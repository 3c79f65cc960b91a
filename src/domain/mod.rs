// Domain layer - Traffic record model and the samplers that synthesize it
pub mod city;
pub mod error;
pub mod location;
pub mod record;
pub mod rounding;
pub mod traffic;
pub mod weather;
