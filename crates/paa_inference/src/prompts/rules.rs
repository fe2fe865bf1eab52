//! Instruction text shared by the article prompts.

pub const SOURCE_SEPARATOR: &str = "\n\n--- NEXT SOURCE ---\n\n";

pub const NO_SOURCES_FALLBACK: &str = "No sources were provided. Write from general knowledge about the topic \
and state clearly in the article that it relies on general knowledge and that readers should consult \
specific sources for precise information. Do not invent names, figures or contact details.";

/// Smallest ranked list asked for when the keyword is a "best of" query.
pub const MIN_RANKED_OPTIONS: usize = 3;

pub const SUPERLATIVE_TERMS: &[&str] = &["best", "top", "mejor", "mejores"];

pub const ROLE: &str = "You are an SEO specialist and web copywriter. You write clean, semantic HTML \
articles ready to paste into WordPress.";

pub const SOURCES_ONLY: &str = "IMPORTANT: use EXCLUSIVELY the provided sources as your knowledge base. \
Never add facts, names, prices, figures or contact details that are not in the sources.";

pub const NO_BOILERPLATE: &str = "Do not write introductions or sentences such as \"based on the sources \
provided\" or similar. Write as an expert on the subject.";

pub const SAFE_LINKS: &str = "Every external link must carry rel=\"noopener nofollow\".";

pub const COMMON_RULES: &[&str] = &[
    "Highlight important words and phrases with <strong> tags.",
    "Include at least one comparison HTML <table> when the topic allows it.",
    "Use bullet lists (<ul>) to present several points or features.",
    "Use <div> blocks with custom classes (for example class=\"note\" or class=\"warning\") to highlight key information.",
    "Use a friendly, professional tone.",
    "Return clean, semantically correct HTML only, without <html>, <head> or <body> wrappers and without Markdown fences.",
];

pub const INFORMATIONAL_RULES: &[&str] = &[
    "Turn every question into an <h3> subtitle.",
    "Answer every question completely, with at least two paragraphs under each subtitle.",
];

pub const DIRECTORY_RULES: &[&str] = &[
    "Open with a general introduction to the type of service, professional or business.",
    "List every establishment, professional or company found in the sources as a directory.",
    "Give each directory entry its own <h3> subtitle with the name of the business or professional.",
    "For each entry include a detailed description of services or specialities.",
    "For each entry include contact details (address, phone, website, social networks) when the sources have them.",
    "For each entry include opening hours when the sources have them.",
    "For each entry include ratings or reviews when the sources have them.",
    "Include a comparison <table> of the listed options.",
    "End with a \"Frequently Asked Questions\" section that uses the provided questions as headings.",
    "ANSWER every frequently asked question with complete, detailed paragraphs; never just restate the question.",
];

pub const IMPROVEMENT_RULES: &[&str] = &[
    "Keep the existing structure: keep every section, heading order and the overall layout.",
    "Do not introduce new factual claims, names, figures or contact details; only rework what is already there.",
    "Keep keyword density natural, never stuffed.",
    "Sharpen the title and subtitles for impact and SEO.",
    "If the keyword is about \"best\" options or comparisons, make sure there is a clear ordered list.",
    "Add or improve visual elements: tables, bullet lists and highlighted blocks.",
    "Add semantic markup where appropriate.",
    "Improve calls to action.",
    "Make paragraphs flow naturally and strengthen the coherence of the text.",
];
