// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fuzzy-matching context for SQL generation.
//!
//! Reads the distinct city/developer/project names live from storage and
//! renders a size-capped hint block, so the generator can resolve
//! misspellings into correct `LIKE` patterns. Also provides LLM-backed
//! city-name normalization for callers that want a canonical name up front.

use reva_core::types::TenantContext;
use reva_core::{CompletionProvider, CompletionRequest, RevaError, SqlExecutor};
use tracing::warn;

use crate::prompts::CITY_NORMALIZER_SYSTEM_PROMPT;

/// Caps keep the hint block inside a predictable prompt budget.
const MAX_CITIES: usize = 20;
const MAX_DEVELOPERS: usize = 20;
const MAX_PROJECTS: usize = 30;

/// Builds the "AVAILABLE DATA IN DATABASE" hint block.
///
/// Recomputed per request; seed data can change between sessions and the
/// lists are cheap to read.
pub async fn fuzzy_context(
    executor: &dyn SqlExecutor,
    tenant: &TenantContext,
) -> Result<String, RevaError> {
    let cities = executor.distinct_cities().await?;
    let developers = executor.distinct_developers(tenant).await?;
    let projects = executor.distinct_project_names(tenant).await?;

    let mut context = String::from("\nAVAILABLE DATA IN DATABASE:\n");
    append_section(&mut context, "Cities", &cities, MAX_CITIES);
    append_section(&mut context, "Developers", &developers, MAX_DEVELOPERS);
    append_section(&mut context, "Projects", &projects, MAX_PROJECTS);
    context.push_str("\n\nIMPORTANT: Use LIKE with wildcards for fuzzy matching on these names.\n");

    Ok(context)
}

fn append_section(context: &mut String, label: &str, names: &[String], cap: usize) {
    if names.is_empty() {
        return;
    }
    let shown = &names[..names.len().min(cap)];
    context.push_str(&format!("\n{label}: {}", shown.join(", ")));
    if names.len() > cap {
        context.push_str(&format!(" (and {} more)", names.len() - cap));
    }
    context.push('\n');
}

/// Normalizes a possibly misspelled city name against the known-city list.
///
/// Exact case-insensitive matches short-circuit without an LLM call. The
/// LLM's suggestion is only trusted when it verifies against the list;
/// anything else -- including gateway failures -- falls back to the raw
/// input, so this helper never fails a turn.
pub async fn normalize_city(
    provider: &dyn CompletionProvider,
    executor: &dyn SqlExecutor,
    model_id: &str,
    city_input: &str,
) -> String {
    let known_cities = match executor.distinct_cities().await {
        Ok(cities) => cities,
        Err(e) => {
            warn!(error = %e, "city list unavailable, skipping normalization");
            return city_input.to_string();
        }
    };
    if known_cities.is_empty() {
        return city_input.to_string();
    }

    if let Some(exact) = known_cities
        .iter()
        .find(|c| c.eq_ignore_ascii_case(city_input))
    {
        return exact.clone();
    }

    let prompt = format!(
        "Input city name: {city_input}\nValid cities: {}\n\nCorrect city name:",
        known_cities.join(", ")
    );
    let request = CompletionRequest::new(model_id, prompt)
        .with_system(CITY_NORMALIZER_SYSTEM_PROMPT)
        .with_temperature(0.0);

    match provider.complete(request).await {
        Ok(response) => {
            let suggested = response.trim();
            known_cities
                .iter()
                .find(|c| c.eq_ignore_ascii_case(suggested))
                .cloned()
                .unwrap_or_else(|| city_input.to_string())
        }
        Err(e) => {
            warn!(error = %e, "city normalization call failed, keeping input");
            city_input.to_string()
        }
    }
}

/// Project names that contain the input, or are contained by it,
/// case-insensitively.
pub async fn matching_projects(
    executor: &dyn SqlExecutor,
    tenant: &TenantContext,
    project_input: &str,
) -> Result<Vec<String>, RevaError> {
    Ok(substring_matches(
        &executor.distinct_project_names(tenant).await?,
        project_input,
    ))
}

/// Developer names that contain the input, or are contained by it,
/// case-insensitively.
pub async fn matching_developers(
    executor: &dyn SqlExecutor,
    tenant: &TenantContext,
    developer_input: &str,
) -> Result<Vec<String>, RevaError> {
    Ok(substring_matches(
        &executor.distinct_developers(tenant).await?,
        developer_input,
    ))
}

fn substring_matches(names: &[String], input: &str) -> Vec<String> {
    let needle = input.to_lowercase();
    names
        .iter()
        .filter(|name| {
            let candidate = name.to_lowercase();
            candidate.contains(&needle) || needle.contains(&candidate)
        })
        .cloned()
        .collect()
}
