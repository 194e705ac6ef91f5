//! Per-domain field mapping.
//!
//! Each [`ContentDomain`] maps to exactly one transformer; adding a domain
//! without a transformer is a compile error.

mod blog;
mod catalog;
pub(crate) mod common;
mod navigation;
mod pages;
mod people;
mod portfolio;
mod service;

use contentseed_shared::ContentDomain;

use crate::Fields;
use crate::build::Ctx;
use crate::record::Record;

/// Map a raw record into document fields (natural key not yet applied).
pub(crate) fn map_fields(domain: ContentDomain, ctx: Ctx<'_>, rec: Record<'_>) -> Fields {
    use ContentDomain::*;
    match domain {
        Navbar => navigation::navbar(ctx, rec),
        Footer => navigation::footer(ctx, rec),
        Home => pages::home(ctx, rec),
        About => pages::about(ctx, rec),
        Contact => pages::contact(ctx, rec),
        Seo | WebDevelopment | SocialMedia | PaidAds | Branding => service::transform(ctx, rec),
        Portfolio => portfolio::project(ctx, rec),
        CaseStudies => portfolio::case_study(ctx, rec),
        Testimonials => people::testimonial(ctx, rec),
        Team => people::team_member(ctx, rec),
        Pricing => catalog::pricing_plan(ctx, rec),
        Faq => catalog::faq_category(ctx, rec),
        Blog => blog::post(ctx, rec),
    }
}
