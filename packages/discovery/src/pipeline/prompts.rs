//! Prompt builders for the completion-backed pipeline steps.

use crate::types::{CandidateHit, SearchHit};

/// Snippets beyond this are cut; titles carry most of the signal.
const MAX_SNIPPET_CHARS: usize = 200;

/// Prompt for extracting concrete product names from a pool of search
/// hits.
///
/// The grounding contract lives in the prompt: only names literally
/// present in the supplied text may be returned. Enforcement is by
/// instruction, not post-hoc filtering.
pub fn build_name_extraction_prompt(category: &str, count: usize, pool: &[SearchHit]) -> String {
    let mut prompt = format!(
        "You are identifying specific purchasable products for the gift \
         category \"{}\".\n\n## Search Results\n\n",
        category
    );

    for (i, hit) in pool.iter().enumerate() {
        prompt.push_str(&format!("{}. {} | {}", i + 1, hit.title, hit.url));
        if let Some(snippet) = &hit.snippet {
            prompt.push_str(&format!(" | \"{}\"", truncate(snippet, MAX_SNIPPET_CHARS)));
        }
        prompt.push('\n');
    }

    prompt.push_str(&format!(
        "\n## Task\n\n\
         Extract up to {count} distinct product names from the search \
         results above.\n\n\
         Rules:\n\
         - Only return product names that literally appear in the titles \
         or snippets above. Do NOT invent, complete, or guess product \
         names that are not grounded in this text.\n\
         - Prefer specific, purchasable products (brand + model) over \
         generic categories.\n\
         - If fewer than {count} grounded names exist, return fewer.\n\n\
         Respond with a JSON object: {{\"products\": [\"name\", ...]}}\n"
    ));

    prompt
}

/// Prompt for selecting purchase-page URLs from the pooled hits.
pub fn build_url_selection_prompt(pool: &[CandidateHit], count: usize) -> String {
    let mut prompt = String::from(
        "You are selecting which search results are direct e-commerce \
         purchase pages.\n\n## Candidates\n\n",
    );

    for (i, candidate) in pool.iter().enumerate() {
        prompt.push_str(&format!(
            "{}. [{}] {} | {}\n",
            i,
            candidate.product_name,
            candidate.hit.title,
            candidate.hit.url
        ));
    }

    prompt.push_str(&format!(
        "\n## Task\n\n\
         Select exactly {count} candidates (by index) that are direct \
         e-commerce purchase pages where the product can be bought.\n\n\
         Rules:\n\
         - Exclude review sites, comparison sites, and editorial content.\n\
         - Prefer covering distinct product names (shown in brackets) over \
         multiple pages for the same product.\n\n\
         Respond with a JSON object: {{\"selections\": [index, ...]}}\n"
    ));

    prompt
}

pub(crate) fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while !s.is_char_boundary(end) && end > 0 {
            end -= 1;
        }
        &s[..end]
    }
}
