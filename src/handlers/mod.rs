pub mod auth;
pub mod jobs;
pub mod orders;
pub mod proposals;
pub mod reviews;

use actix_web::web;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Auth routes (protected by JWT via the AuthenticatedUser extractor) ──
    cfg.service(web::scope("/auth").route("/me", web::get().to(auth::me)));

    // ── Job routes (reads are public; mutations require the owning client) ──
    cfg.service(
        web::scope("/jobs")
            .route("", web::get().to(jobs::get_jobs))
            .route("", web::post().to(jobs::create_job))
            .route("/mine", web::get().to(jobs::get_my_jobs))
            .route("/{id}", web::get().to(jobs::get_job))
            .route("/{id}", web::put().to(jobs::update_job))
            .route("/{id}", web::delete().to(jobs::delete_job))
            .route("/{id}/proposals", web::post().to(proposals::submit_proposal))
            .route(
                "/{id}/proposals",
                web::get().to(proposals::get_proposals_for_job),
            ),
    );

    // ── Proposal routes ──
    cfg.service(
        web::scope("/proposals")
            .route("", web::get().to(proposals::get_proposals_for_my_jobs))
            .route("/{id}/decision", web::put().to(proposals::decide_proposal)),
    );

    // ── Order routes (terminal transitions belong to the order's freelancer) ──
    cfg.service(
        web::scope("/orders")
            .route("", web::get().to(orders::get_orders))
            .route("/{id}/complete", web::post().to(orders::complete_order))
            .route("/{id}/cancel", web::post().to(orders::cancel_order))
            .route("/{id}/reviews", web::post().to(reviews::add_review)),
    );

    // ── Review reads ──
    cfg.service(web::scope("/reviews").route(
        "/freelancer/{id}",
        web::get().to(reviews::get_reviews_for_freelancer),
    ));
}
