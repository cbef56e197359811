#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use itertools::Itertools;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::format::{FormattedLine, format_content};
use crate::geo::{find_state, state_facts};
use crate::knowledge::{KnowledgeEntity, KnowledgeStore, KnowledgeSubmission, submit_knowledge};
use crate::links::inline::LinkedSegment;
use crate::links::inline::InlineLinker;
use crate::links::{LinkResolver, ViewAction, actions_for, primary_link};
use crate::news::{HeadlineClient, StateNewsClient};
use crate::timeline::build_timeline;

fn spinner(message: &str) -> ProgressBar {
    let bar = if console::user_attended_stderr() {
        ProgressBar::new_spinner().with_style(
            ProgressStyle::with_template("{spinner} {msg}").expect("style template is valid"),
        )
    } else {
        ProgressBar::hidden()
    };
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

fn load_resolver() -> Result<(Config, LinkResolver)> {
    let config = Config::load_default().context("Failed to load configuration")?;
    let store = KnowledgeStore::from_config(&config.api)
        .context("Failed to set up the knowledge store")?;
    Ok((config, LinkResolver::new(Arc::new(store))))
}

fn request_timeout(config: &Config) -> Duration {
    Duration::from_secs(config.api.timeout_seconds)
}

fn print_entity_summary(entity: &KnowledgeEntity) {
    println!("{} ({})", style(&entity.title).bold(), style(&entity.id).dim());
    if let Some(description) = &entity.short_description {
        println!("   {}", description);
    }
    if !entity.tags().is_empty() {
        println!("   Tags: {}", entity.tags().join(", "));
    }
}

fn print_actions(actions: &[ViewAction]) {
    if actions.is_empty() {
        println!("   No view actions");
        return;
    }
    for action in actions {
        println!("   → {} {}", action.label(), style(action.url()).cyan());
    }
}

fn render_segments(segments: &[LinkedSegment]) -> String {
    segments
        .iter()
        .map(|segment| match &segment.link_id {
            Some(id) => format!("{}[{}]", style(&segment.text).underlined(), id),
            None => segment.text.clone(),
        })
        .join("")
}

fn print_entities(entities: &[KnowledgeEntity], empty_message: &str) {
    if entities.is_empty() {
        println!("{}", empty_message);
        return;
    }
    for entity in entities {
        print_entity_summary(entity);
    }
    println!();
    println!("{} entries", entities.len());
}

/// List every entry, or only those carrying one of `tags`
#[inline]
pub async fn list_entities(tags: &[String]) -> Result<()> {
    let (_, resolver) = load_resolver()?;

    let bar = spinner("Loading knowledge base");
    let entities = if tags.is_empty() {
        resolver.store().all_entities().await
    } else {
        resolver.entities_by_tags(tags).await
    };
    bar.finish_and_clear();

    print_entities(&entities, "No knowledge entries found.");
    Ok(())
}

/// Show one entry with formatted, cross-linked content and its view actions
#[inline]
pub async fn show_entity(id: &str) -> Result<()> {
    let (_, resolver) = load_resolver()?;
    print_entity(resolver.store(), id).await
}

/// Everything printed comes from one snapshot of the collection
async fn print_entity(store: &KnowledgeStore, id: &str) -> Result<()> {
    let bar = spinner("Loading knowledge base");
    let collection = store.get_all().await;
    bar.finish_and_clear();

    let entity = collection
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("Knowledge entry not found: {}", id))?;
    let linker = InlineLinker::new(&collection);

    print_entity_summary(entity);

    if let Some(context) = &entity.historical_context {
        match (context.year, &context.era) {
            (Some(year), Some(era)) => println!("   {} ({})", era, year),
            (Some(year), None) => println!("   Year: {}", year),
            (None, Some(era)) => println!("   {}", era),
            (None, None) => {}
        }
    }

    if let Some(content) = &entity.full_content {
        println!();
        for line in format_content(content) {
            let rendered = render_line(&line, |text| render_segments(&linker.link(text)));
            println!("  • {}", rendered);
        }
    }

    let related = collection.related_to(entity);
    if !related.is_empty() {
        println!();
        println!("Related:");
        for other in related {
            println!("   {} ({})", other.title, style(&other.id).dim());
        }
    }

    println!();
    println!("Actions:");
    print_actions(&actions_for(entity));
    println!("Primary link: {}", primary_link(entity));

    Ok(())
}

fn render_line(line: &FormattedLine, link: impl Fn(&str) -> String) -> String {
    line.spans
        .iter()
        .map(|span| {
            let text = link(&span.text);
            if span.bold {
                style(text).bold().to_string()
            } else {
                text
            }
        })
        .collect()
}

#[inline]
pub async fn search_entities(query: &str) -> Result<()> {
    let (_, resolver) = load_resolver()?;

    let bar = spinner("Searching");
    let results = resolver.store().search(query).await;
    bar.finish_and_clear();

    print_entities(&results, &format!("No entries match \"{}\".", query));
    Ok(())
}

#[inline]
pub async fn show_actions(id: &str) -> Result<()> {
    let (_, resolver) = load_resolver()?;
    print_entity_actions(resolver.store(), id).await;
    Ok(())
}

async fn print_entity_actions(store: &KnowledgeStore, id: &str) {
    let Some(entity) = store.get_by_id(id).await else {
        println!("Knowledge entry not found: {}", id);
        return;
    };

    print_entity_summary(&entity);
    print_actions(&actions_for(&entity));
}

/// Print the states and union territories mentioned in `text`
#[inline]
pub fn detect_states_in(text: &str) {
    let states = crate::geo::detect_states(text);
    if states.is_empty() {
        println!("No states detected.");
        return;
    }
    for state in states {
        println!("{}", state);
    }
}

/// Sidebar view of a state: map resource, facts, related entries and news
#[inline]
pub async fn show_state(name: &str, with_news: bool) -> Result<()> {
    let info = find_state(name).ok_or_else(|| anyhow::anyhow!("Unknown state: {}", name))?;
    let (config, resolver) = load_resolver()?;

    println!("{}", style(info.name).bold().underlined());
    if info.display_name() != info.name {
        println!("   Short name: {}", info.display_name());
    }
    let [lng, lat] = info.centroid();
    println!("   Centroid: {:.4}, {:.4}", lat, lng);
    println!("   Boundary: {}", info.boundary_path);

    match state_facts(info.name) {
        Some(facts) => {
            for (section, items) in facts.sections() {
                if items.is_empty() {
                    continue;
                }
                println!();
                println!("{}", style(section).bold());
                for item in items {
                    println!("  • {}", item);
                }
            }
        }
        None => println!("   No facts recorded for this state."),
    }

    let bar = spinner("Loading knowledge base");
    let related = resolver.entities_for_state(info.name).await;
    bar.finish_and_clear();

    if !related.is_empty() {
        println!();
        println!("{}", style("Related entries").bold());
        for entity in &related {
            println!("   {} ({})", entity.title, style(&entity.id).dim());
        }
    }

    if with_news {
        let client = StateNewsClient::new(&config.gemini, request_timeout(&config));
        let bar = spinner("Fetching headlines");
        let response = client.headlines(info.name).await;
        bar.finish_and_clear();

        println!();
        println!("{}", style("Recent news").bold());
        for headline in &response.news {
            println!("  • {}", headline);
        }
        if let Some(error) = &response.error {
            println!("   {}", style(error).yellow());
        }
    }

    Ok(())
}

/// Print `text` with knowledge titles marked as links
#[inline]
pub async fn link_text(text: &str) -> Result<()> {
    let (_, resolver) = load_resolver()?;
    let linker = resolver.inline_linker().await;

    let segments = linker.link(text);
    println!("{}", render_segments(&segments));

    for segment in segments.iter().filter(|s| s.is_link()) {
        if let Some(id) = &segment.link_id {
            println!("   {} → {}", segment.text, id);
        }
    }
    Ok(())
}

#[inline]
pub async fn show_timeline(entity: Option<&str>, tag: Option<&str>) -> Result<()> {
    let (_, resolver) = load_resolver()?;

    let bar = spinner("Loading knowledge base");
    let collection = resolver.store().get_all().await;
    bar.finish_and_clear();

    let timeline = build_timeline(&collection, entity, tag);

    if let Some(focused) = &timeline.focused {
        println!("Focused on {}", style(focused).bold());
        println!();
    }
    if timeline.facts.is_empty() {
        println!("No historical entries found.");
        return Ok(());
    }

    for fact in &timeline.facts {
        let year = fact.year.map(|y| format!(" ({})", y)).unwrap_or_default();
        println!(
            "{} {}{}",
            style(format!("[{}]", fact.era)).cyan(),
            style(&fact.title).bold(),
            year
        );
        println!("   {} · {}", fact.topic, fact.content);
        for point in &fact.key_points {
            println!("   - {}", point);
        }
        for person in &fact.personalities {
            println!("   {} ({})", person.name, style(&person.role).dim());
        }
        if !fact.places.is_empty() {
            let places: Vec<&str> = fact.places.iter().map(|p| p.name.as_str()).collect();
            println!("   Places: {}", places.join(", "));
        }
        println!();
    }
    Ok(())
}

/// Send a new entry to the backend for validation and storage
#[inline]
pub async fn add_entity(title: String, description: String, category: String) -> Result<()> {
    let (config, resolver) = load_resolver()?;
    let submission = KnowledgeSubmission::new(title, description, category);

    info!("Adding knowledge entry: {}", submission.title);

    let bar = spinner("Submitting");
    let outcome = submit_knowledge(&config.api, resolver.store(), &submission).await;
    bar.finish_and_clear();

    let outcome = outcome?;
    if outcome.is_success() {
        println!("{} {}", style("✓").green(), outcome.message());
    } else {
        println!("{} {}", style("✗").red(), outcome.message());
    }
    Ok(())
}

/// Articles published on `date` about `keywords`
#[inline]
pub async fn show_news(date: &str, keywords: Option<&str>) -> Result<()> {
    let config = Config::load_default().context("Failed to load configuration")?;
    let client = HeadlineClient::new(&config.news, request_timeout(&config));

    let bar = spinner("Fetching news");
    let response = client.search(date, keywords).await;
    bar.finish_and_clear();

    if let Some(error) = &response.error {
        println!("{}", style(error).yellow());
    }
    for article in &response.news {
        println!("{}", style(&article.title).bold());
        if let Some(description) = &article.description {
            println!("   {}", description);
        }
        println!("   {} · {}", article.source, style(&article.url).cyan());
    }
    Ok(())
}
