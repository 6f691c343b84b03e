//! services/api/src/bin/openapi.rs
//!
//! Prints the OpenAPI document to stdout, for generating clients or
//! publishing the spec without starting the server.

use api_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

fn main() {
    match ApiDoc::openapi().to_pretty_json() {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Failed to render the OpenAPI document: {e}");
            std::process::exit(1);
        }
    }
}
