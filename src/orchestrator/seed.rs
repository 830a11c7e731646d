//! Built-in sample alerts loaded on startup when `seed_defaults` is set.

use crate::models::alert::NewAlert;
use crate::models::schedule::ScheduleSpec;

/// Sample website-maintenance alerts.
#[must_use]
pub fn default_alerts() -> Vec<NewAlert> {
    let sample = |name: &str, prompt: &str, email: &str, schedule: ScheduleSpec| NewAlert {
        name: name.to_owned(),
        prompt: prompt.to_owned(),
        email: email.to_owned(),
        schedule,
        is_ai_generated: true,
    };

    vec![
        sample("Enlaces rotos", "Scan for 404 links.", "admin@ag.com", ScheduleSpec::daily()),
        sample(
            "Enlaces incorrectos",
            "Verify outbound links.",
            "seo@ag.com",
            ScheduleSpec::daily(),
        ),
        sample(
            "Textos - erratas",
            "Review drafts for typos.",
            "editor@ag.com",
            ScheduleSpec::hourly(1),
        ),
        sample(
            "Informacion actualizada",
            "Check About Us page.",
            "content@ag.com",
            ScheduleSpec::weekly(1),
        ),
        sample(
            "Preguntas frecuentes",
            "Generate FAQ from tickets.",
            "support@ag.com",
            ScheduleSpec::daily(),
        ),
        sample("CTAs", "Analyze CTA performance.", "mkt@ag.com", ScheduleSpec::daily()),
        sample("Imagenes", "Check alt tags.", "dev@ag.com", ScheduleSpec::weekly(5)),
        sample(
            "Diseño",
            "Check mobile responsiveness.",
            "design@ag.com",
            ScheduleSpec::weekly(3),
        ),
    ]
}
