// Application layer: pipelines wiring domain logic to adapters.

pub mod pipelines;
