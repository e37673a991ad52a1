pub mod json_api;

pub use json_api::{
    generate_teams, generate_teams_json, suggest_swap, suggest_swap_json, GenerateRequest,
    GenerateResponse, SwapRequest, SwapResponse, SCHEMA_VERSION,
};
