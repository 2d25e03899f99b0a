/// Resolves a message id plus named values into display text.
pub trait MessageFormatter {
    fn format(&self, id: &str, values: &[(&str, &str)]) -> String;

    fn text(&self, id: &str) -> String {
        self.format(id, &[])
    }
}

/// Built-in English catalog. Unknown ids render as the id itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnglishMessages;

fn english_template(id: &str) -> Option<&'static str> {
    Some(match id {
        "graph.entity.unknown" => "Unknown",
        "graph.search.placeholder" => "Search entities",
        "graph.empty" => "No graph data for {collection}",
        "graph.refresh" => "Refresh",
        "graph.fullscreen.enter" => "Fullscreen",
        "graph.fullscreen.exit" => "Exit fullscreen",
        "graph.detail.title" => "Entity details",
        _ => return None,
    })
}

/// Replaces every `{name}` with its value; placeholders without a value are
/// left untouched.
pub fn fill_placeholders(template: &str, values: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find('}') else {
            output.push_str(&rest[open..]);
            return output;
        };

        let name = &after_open[..close];
        match values.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => output.push_str(value),
            None => output.push_str(&rest[open..open + close + 2]),
        }
        rest = &after_open[close + 1..];
    }

    output.push_str(rest);
    output
}

impl MessageFormatter for EnglishMessages {
    fn format(&self, id: &str, values: &[(&str, &str)]) -> String {
        match english_template(id) {
            Some(template) => fill_placeholders(template, values),
            None => id.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids_resolve_and_substitute() {
        let messages = EnglishMessages;
        assert_eq!(messages.text("graph.entity.unknown"), "Unknown");
        assert_eq!(
            messages.format("graph.empty", &[("collection", "docs")]),
            "No graph data for docs"
        );
    }

    #[test]
    fn unknown_ids_render_as_themselves() {
        assert_eq!(EnglishMessages.text("graph.nope"), "graph.nope");
    }

    #[test]
    fn missing_values_keep_placeholder() {
        assert_eq!(fill_placeholders("a {x} b {y}", &[("y", "2")]), "a {x} b 2");
        assert_eq!(fill_placeholders("open {brace", &[]), "open {brace");
        assert_eq!(fill_placeholders("{n}{n}", &[("n", "1")]), "11");
    }
}
