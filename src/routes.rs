use crate::{api::payroll, config::Config};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let preview_limiter = Arc::new(build_limiter(config.rate_preview_per_min));
    let confirm_limiter = Arc::new(build_limiter(config.rate_confirm_per_min));
    let read_limiter = Arc::new(build_limiter(config.rate_read_per_min));

    cfg.service(
        web::scope(&config.api_prefix).service(
            web::scope("/payroll")
                // /payroll/preview
                .service(
                    web::resource("/preview")
                        .wrap(preview_limiter.clone())
                        .route(web::get().to(payroll::preview)),
                )
                // /payroll/confirm
                .service(
                    web::resource("/confirm")
                        .wrap(confirm_limiter.clone())
                        .route(web::post().to(payroll::confirm_run)),
                )
                // /payroll/runs
                .service(
                    web::resource("/runs")
                        .wrap(read_limiter.clone())
                        .route(web::get().to(payroll::list_runs)),
                )
                // /payroll/runs/{id}
                .service(
                    web::resource("/runs/{id}")
                        .wrap(read_limiter.clone())
                        .route(web::get().to(payroll::get_run)),
                ),
        ),
    );
}
