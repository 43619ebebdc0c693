pub const STORY: &str = include_str!("../data/prompts/story.txt");
pub const IMAGE: &str = include_str!("../data/prompts/image.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}
