use paa_core::{ArticleVariant, GenerationRequest};

pub mod rules;

pub use rules::{MIN_RANKED_OPTIONS, NO_SOURCES_FALLBACK, SOURCE_SEPARATOR};

/// A system + user instruction pair for one completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// True when the keyword reads like a "best of" / "top N" query.
pub fn is_superlative(keyword: &str) -> bool {
    keyword
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .any(|word| {
            let word = word.to_lowercase();
            rules::SUPERLATIVE_TERMS.contains(&word.as_str())
        })
}

fn bullet_list(items: &[&str]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_questions(questions: &[String]) -> String {
    questions
        .iter()
        .map(|q| format!("- {}", q.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_sources(request: &GenerationRequest) -> Option<String> {
    let sources = request.non_empty_sources();
    if sources.is_empty() {
        None
    } else {
        Some(sources.join(SOURCE_SEPARATOR))
    }
}

fn ranked_list_clause(keyword: &str) -> String {
    format!(
        "The keyword \"{}\" asks for a ranking or comparison. Include an ordered list (<ol>) with at least {} \
concrete options, each one taken only from the source material, and explain briefly why each one is listed.",
        keyword.trim(),
        MIN_RANKED_OPTIONS
    )
}

fn system_instruction(request: &GenerationRequest) -> String {
    let keyword = request.keyword.trim();
    let (kind, variant_rules) = match request.variant {
        ArticleVariant::Informational => (
            "Generate an HTML article that answers the Google \"People Also Ask\" questions about the topic.",
            rules::INFORMATIONAL_RULES,
        ),
        ArticleVariant::Directory => (
            "Generate a DIRECTORY-style HTML article about the topic.",
            rules::DIRECTORY_RULES,
        ),
    };

    let keyword_rule = format!("Optimize the content for the main keyword: \"{}\".", keyword);
    let mut all_rules: Vec<&str> = variant_rules.to_vec();
    all_rules.extend_from_slice(rules::COMMON_RULES);
    all_rules.push(&keyword_rule);
    all_rules.push(rules::SAFE_LINKS);

    format!(
        "{}\n{}\n{}\n\nThe article must follow these rules:\n{}\n\n{}",
        rules::ROLE,
        kind,
        rules::SOURCES_ONLY,
        bullet_list(&all_rules),
        rules::NO_BOILERPLATE,
    )
}

fn user_instruction(request: &GenerationRequest) -> String {
    let keyword = request.keyword.trim();
    let questions = format_questions(&request.questions);
    let sources = format_sources(request).unwrap_or_else(|| NO_SOURCES_FALLBACK.to_string());

    let mut sections = vec![format!("MAIN KEYWORD: {}", keyword)];

    match request.variant {
        ArticleVariant::Informational => {
            sections.push(format!("QUESTIONS TO ANSWER:\n{}", questions));
            sections.push(format!("SOURCES (USE ONLY THIS INFORMATION):\n{}", sources));
            sections.push(
                "Write a complete HTML article that answers every question in detail. Each question is an <h3> \
subtitle followed by at least two paragraphs. Include at least one comparison table, bullet lists for key \
points, well-defined sections and highlighted <div> blocks for tips or warnings."
                    .to_string(),
            );
        }
        ArticleVariant::Directory => {
            sections.push(format!("FREQUENTLY ASKED QUESTIONS (FOR THE END OF THE ARTICLE):\n{}", questions));
            sections.push(format!("SOURCES (USE ONLY THIS INFORMATION):\n{}", sources));
            sections.push(
                "Write a DIRECTORY-style HTML article with:\n\
1. An introduction to the type of service or professional presented.\n\
2. A detailed listing of the professionals, companies or places found EXCLUSIVELY in the sources, one <h3> per entry.\n\
3. For each entry: name, description, contact details, services and opening hours when available.\n\
4. A comparison table of the listed options.\n\
5. A final Frequently Asked Questions section that answers EACH question completely.\n\
6. Bullet lists for features or services and highlighted <div> blocks for key information."
                    .to_string(),
            );
        }
    }

    if is_superlative(keyword) {
        sections.push(ranked_list_clause(keyword));
    }

    sections.push(format!(
        "Do not fabricate information that is not in the sources. {} {}",
        rules::NO_BOILERPLATE,
        rules::SAFE_LINKS
    ));

    sections.join("\n\n")
}

/// Instructions for a fresh article.
pub fn build_generation_prompt(request: &GenerationRequest) -> Prompt {
    Prompt {
        system: system_instruction(request),
        user: user_instruction(request),
    }
}

/// Instructions for a polishing pass over an article that already exists.
/// `existing_html` is embedded verbatim.
pub fn build_improvement_prompt(existing_html: &str, keyword: &str) -> Prompt {
    let keyword = keyword.trim();
    let system = format!(
        "{}\nYour task is to improve the provided HTML article so it ranks better and reads better.\n\n\
Apply these improvements:\n{}\n- {}\n- {}\n\nKeep the output as clean HTML.",
        rules::ROLE,
        bullet_list(rules::IMPROVEMENT_RULES),
        rules::SAFE_LINKS,
        rules::COMMON_RULES[1],
    );

    let mut sections = vec![format!("MAIN KEYWORD: {}", keyword)];
    if is_superlative(keyword) {
        sections.push(format!(
            "The article must keep (or gain) an ordered list of at least {} options, using only options already in the article.",
            MIN_RANKED_OPTIONS
        ));
    }
    sections.push(
        "Improve the following HTML article for SEO and visual appeal:\n\
1. If there is no table yet, ADD at least one table for comparative information already in the article.\n\
2. If there are not enough bullet lists, ADD more to improve readability.\n\
3. Highlight important content.\n\
Preserve the existing structure and do not add new facts."
            .to_string(),
    );
    sections.push(format!("HTML ARTICLE:\n{}", existing_html));

    Prompt {
        system,
        user: sections.join("\n\n"),
    }
}
