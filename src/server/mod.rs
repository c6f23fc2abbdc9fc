//! HTTP server layer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │            GET|PUT /tiles/{layer}/{z}/{x}/{y}.png               │
//! │                                                                 │
//! │  ┌─────────────────────────────┐  ┌─────────────────────────┐   │
//! │  │          handlers           │  │         routes          │   │
//! │  │ (requests, error mapping)   │  │  (router, CORS, trace)  │   │
//! │  └─────────────────────────────┘  └─────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    health_handler, layers_handler, seed_tile_handler, tile_handler, AppState, ErrorResponse,
    HealthResponse, LayerResponse, LayersResponse, TilePathParams, TILE_FILTER_HEADER,
    TILE_OUTCOME_HEADER,
};
pub use routes::{create_router, RouterConfig};
