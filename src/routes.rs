use crate::{
    api::{attendance, notification},
    auth::middleware::auth_middleware,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

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

    let protected_limiter = build_limiter(config.rate_protected_per_min);

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(
                        web::resource("")
                            .route(web::post().to(attendance::create_event)),
                    )
                    .service(
                        web::resource("/check-in").route(web::post().to(attendance::check_in)),
                    )
                    .service(
                        web::resource("/check-out").route(web::post().to(attendance::check_out)),
                    )
                    .service(
                        web::resource("/my-records").route(web::get().to(attendance::my_records)),
                    )
                    .service(
                        web::resource("/employee/{employee_id}/records")
                            .route(web::get().to(attendance::employee_records)),
                    )
                    .service(
                        web::resource("/summary/daily")
                            .route(web::get().to(attendance::my_daily_summary)),
                    )
                    .service(
                        web::resource("/summary/daily/{employee_id}")
                            .route(web::get().to(attendance::employee_daily_summary)),
                    )
                    .service(
                        web::resource("/stats/monthly")
                            .route(web::get().to(attendance::my_monthly_stats)),
                    )
                    .service(
                        web::resource("/stats/monthly/{employee_id}")
                            .route(web::get().to(attendance::employee_monthly_stats)),
                    )
                    .service(
                        web::resource("/stats/range")
                            .route(web::get().to(attendance::range_stats)),
                    )
                    .service(web::resource("/all").route(web::get().to(attendance::list_all))),
            )
            .service(
                web::scope("/notifications")
                    // /notifications
                    .service(
                        web::resource("")
                            .route(web::get().to(notification::list_notifications)),
                    )
                    .service(
                        web::resource("/unread")
                            .route(web::get().to(notification::unread_notifications)),
                    )
                    // /notifications/{id}/read
                    .service(
                        web::resource("/{notification_id}/read")
                            .route(web::put().to(notification::mark_read)),
                    ),
            ),
    );
}
