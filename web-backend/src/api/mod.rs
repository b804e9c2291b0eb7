use actix_web::{web, Scope};

pub mod diagnostics;
pub mod scanner;

pub fn create_api_router() -> Scope {
    web::scope("/api")
        .service(diagnostics_routes())
        .service(scanner_routes())
}

fn diagnostics_routes() -> Scope {
    web::scope("/diagnostics")
        .configure(diagnostics::configure_diagnostics_routes)
}

fn scanner_routes() -> Scope {
    web::scope("/scanner")
        .configure(scanner::configure_scanner_routes)
}
