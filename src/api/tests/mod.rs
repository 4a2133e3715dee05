//! API Tests
//!
//! Part organization:
//! - part_01: Liveness and health endpoints, CORS
//! - part_02: Prediction success paths and encoding scenarios
//! - part_03: Error responses
