use anyhow::Result;
use clap::{Arg, Command};
use skillswap::constants::SKILL_BASE_RATES;
use skillswap::db::{DatabaseConfig, catalog, get_db_pool};
use skillswap::utils;
use tracing::{info, warn};

/// Reference catalog: category, description, skills
const CATALOG: &[(&str, &str, &[&str])] = &[
    (
        "Design",
        "Visual identity and interface work",
        &["Graphic Design", "Logo Design", "UI/UX Design"],
    ),
    ("Development", "Websites and web applications", &["Web Development"]),
    (
        "Content",
        "Written and visual content production",
        &["Content Writing", "Copywriting", "Video Editing", "Photography"],
    ),
    (
        "Marketing",
        "Growth, reach and campaign work",
        &[
            "SEO Services",
            "Social Media Management",
            "Marketing Strategy",
            "Email Marketing",
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<()> {
    utils::init_logging();

    let matches = Command::new("seed-catalog")
        .about("Load the reference skill categories and skills")
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Print what would be seeded without touching the database")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let dry_run = matches.get_flag("dry-run");

    for (skill, _) in SKILL_BASE_RATES {
        if !CATALOG.iter().any(|(_, _, skills)| skills.contains(skill)) {
            warn!("Rated skill {} has no catalog category", skill);
        }
    }

    if dry_run {
        for (category, description, skills) in CATALOG {
            info!("{} ({}): {}", category, description, skills.join(", "));
        }
        info!("Dry run. Database was not modified.");
        return Ok(());
    }

    let db_config = DatabaseConfig::from_env()?;
    let pool = get_db_pool(&db_config).await?;

    let mut created = 0;
    for (category, description, skills) in CATALOG {
        let category_id = catalog::ensure_category(&pool, category, Some(*description)).await?;
        for skill in *skills {
            if catalog::ensure_skill(&pool, skill, Some(category_id)).await? {
                created += 1;
                info!("Added skill {} under {}", skill, category);
            }
        }
    }

    info!("✅ Catalog seeded, {} new skills", created);
    Ok(())
}
