// ABOUTME: Renders the frontmatter block placed at the top of each export
// ABOUTME: Fixed key order, values interpolated verbatim

use crate::Post;

/// Builds the `---` delimited metadata block for `post`, without a trailing
/// newline. Values are not escaped, so a title containing YAML syntax is
/// written as-is.
pub fn build_front_matter(post: &Post) -> String {
    let lines = vec![
        "---".to_string(),
        format!("title: {}", post.title),
        format!("isDraft: {}", post.private),
        format!("created: {}", post.created_at),
        format!("modified: {}", post.updated_at),
        "tags:".to_string(),
        // Tag entries form one block; with no tags it is an empty line.
        post.tags
            .iter()
            .map(|tag| format!("   - {}", tag.name))
            .collect::<Vec<_>>()
            .join("\n"),
        "---".to_string(),
    ];

    lines.join("\n")
}

/// Frontmatter and body joined by a single line break.
pub fn compose_markdown(front_matter: &str, body: &str) -> String {
    format!("{}\n{}", front_matter, body)
}
