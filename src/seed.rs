//! Starter content for an empty store.

use aakkai_core::models::{CreateProfileInput, CreateTestimonialInput};
use aakkai_core::{Database, StoreResult};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub testimonials: usize,
    pub profiles: usize,
}

fn testimonials() -> Vec<CreateTestimonialInput> {
    [
        (
            "Aakkai gave our brand a voice we didn't know it had. The new identity landed with customers from day one.",
            "Meera Raghavan",
            "Founder",
            "Kaapi Co.",
        ),
        (
            "Clear process, sharp ideas and a team that actually listens. Our app redesign doubled sign-ups.",
            "Daniel Okafor",
            "Head of Product",
            "Stridewell",
        ),
        (
            "They turned a messy brief into a coherent visual system in weeks.",
            "Lena Fischer",
            "Marketing Director",
            "Nordlicht Health",
        ),
    ]
    .into_iter()
    .map(|(content, author, role, company)| CreateTestimonialInput {
        content: content.into(),
        author: author.into(),
        role: role.into(),
        company: company.into(),
    })
    .collect()
}

fn profiles() -> Vec<CreateProfileInput> {
    vec![
        CreateProfileInput {
            user_id: None,
            name: "Arun Kumar".into(),
            email: Some("arun@aakkai.com".into()),
            role: Some("Creative Director".into()),
            expertise: vec!["Branding".into(), "Identity Design".into()],
            experience: "12 years shaping brands for startups and heritage companies.".into(),
            image_url: String::new(),
        },
        CreateProfileInput {
            user_id: None,
            name: "Nila Suresh".into(),
            email: Some("nila@aakkai.com".into()),
            role: Some("Senior Designer".into()),
            expertise: vec!["UI/UX Designing".into(), "Mobile App".into()],
            experience: "7 years designing product interfaces.".into(),
            image_url: String::new(),
        },
    ]
}

/// Inserts testimonials and provisioned team profiles, each only if its
/// table is empty. Running it twice changes nothing.
pub fn seed(db: &Database) -> StoreResult<SeedReport> {
    let mut report = SeedReport::default();

    if db.list_testimonials()?.is_empty() {
        for input in testimonials() {
            db.create_testimonial(input)?;
            report.testimonials += 1;
        }
    }

    if db.count_profiles()? == 0 {
        for input in profiles() {
            db.create_profile(input)?;
            report.profiles += 1;
        }
    }

    tracing::info!(
        testimonials = report.testimonials,
        profiles = report.profiles,
        "Seeded store"
    );
    Ok(report)
}
