//! Prompt construction for plan generation

use crate::registry::ActionRegistry;

struct CommandDoc {
    name: &'static str,
    signature: &'static str,
    hint: &'static str,
}

const COMMAND_DOCS: &[CommandDoc] = &[
    CommandDoc { name: "runAppByName", signature: r#"runAppByName("App Name")"#, hint: "open an app through the system launcher" },
    CommandDoc { name: "launchApp", signature: r#"launchApp("C:\\full\\path\\to\\app.exe")"#, hint: "start an executable" },
    CommandDoc { name: "openUrl", signature: r#"openUrl("https://...")"#, hint: "open a URL in the default browser" },
    CommandDoc { name: "openFolder", signature: r#"openFolder("path")"#, hint: "" },
    CommandDoc { name: "openFile", signature: r#"openFile("path")"#, hint: "" },
    CommandDoc { name: "focusWindow", signature: r#"focusWindow("Window Title")"#, hint: "" },
    CommandDoc { name: "typeText", signature: r#"typeText("...")"#, hint: "" },
    CommandDoc { name: "pressKey", signature: r#"pressKey("Enter"|"Ctrl+V"|"/"|...)"#, hint: "" },
    CommandDoc { name: "moveTo", signature: "moveTo(x,y)", hint: "" },
    CommandDoc { name: "clickAt", signature: "clickAt(x,y)", hint: "" },
    CommandDoc { name: "wait", signature: "wait(ms)", hint: "" },
    CommandDoc { name: "scroll", signature: "scroll(dx,dy)", hint: "positive dy scrolls up" },
    CommandDoc { name: "copyClipboard", signature: "copyClipboard()", hint: "" },
    CommandDoc { name: "pasteClipboard", signature: "pasteClipboard()", hint: "" },
    CommandDoc { name: "minimizeWindow", signature: "minimizeWindow()", hint: "" },
    CommandDoc { name: "switchApp", signature: "switchApp()", hint: "" },
    CommandDoc { name: "lockWorkstation", signature: "lockWorkstation()", hint: "" },
    CommandDoc { name: "mediaControl", signature: r#"mediaControl("play"|"pause"|"fullscreen"|"exitFullscreen"|"mute"|"next"|"previous")"#, hint: "" },
    CommandDoc { name: "playVideo", signature: "playVideo()", hint: "" },
    CommandDoc { name: "pauseVideo", signature: "pauseVideo()", hint: "" },
    CommandDoc { name: "closeVideo", signature: "closeVideo()", hint: "" },
    CommandDoc { name: "takeScreenshot", signature: r#"takeScreenshot("file.png")"#, hint: "" },
    CommandDoc { name: "adjustVolume", signature: r#"adjustVolume("up"|"down", steps)"#, hint: "" },
    CommandDoc { name: "navigate", signature: r#"navigate("https://...")"#, hint: "load a page in the controlled browser" },
    CommandDoc { name: "clickSelector", signature: r#"clickSelector("css selector")"#, hint: "" },
    CommandDoc { name: "typeSelector", signature: r#"typeSelector("css selector", "text")"#, hint: "" },
    CommandDoc { name: "extractTable", signature: r#"extractTable("css selector", "out.csv")"#, hint: "save a table as CSV" },
    CommandDoc { name: "screenshotRegion", signature: r#"screenshotRegion("css selector", "out.png")"#, hint: "" },
    CommandDoc { name: "orderFlow", signature: r#"orderFlow("flow name", ...)"#, hint: "run a predefined multi-step browser flow" },
];

const EXAMPLE_INSTRUCTION: &str = "Open Microsoft Edge and go to youtube.com and search for cat videos";

const EXAMPLE_PLAN: &[&str] = &[
    r#"runAppByName("Microsoft Edge")"#,
    "wait(3000)",
    r#"typeText("youtube.com")"#,
    r#"pressKey("Enter")"#,
    "wait(5000)",
    r#"pressKey("/")"#,
    "wait(300)",
    r#"typeText("cat videos")"#,
    r#"pressKey("Enter")"#,
];

/// Builds the instruction prompt listing the available commands.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    commands: Vec<String>,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            commands: COMMAND_DOCS
                .iter()
                .filter(|doc| !is_browser_command(doc.name))
                .map(render_doc)
                .collect(),
        }
    }
}

impl PromptBuilder {
    /// Prompt advertising the desktop vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prompt advertising exactly the commands registered in `registry`.
    pub fn for_registry(registry: &ActionRegistry) -> Self {
        let commands = registry
            .names()
            .into_iter()
            .map(|name| match COMMAND_DOCS.iter().find(|doc| doc.name == name) {
                Some(doc) => render_doc(doc),
                None => format!("{}(...)", name),
            })
            .collect();

        Self {
            commands,
            ..Self::default()
        }
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn build(&self, instruction: &str) -> String {
        let mut prompt = String::from(
            "You are an RPA agent running on a desktop computer. Respond ONLY with a pure JSON array of strings.\n\
             Each string must be one of these commands (commands can be repeated and combined as needed to satisfy the instruction):\n",
        );

        for command in &self.commands {
            prompt.push_str("- ");
            prompt.push_str(command);
            prompt.push('\n');
        }

        prompt.push_str(
            "\nIf the instruction contains multiple tasks separated by \"and\", \
             include the commands for each task in order and do not stop until the goal is achieved.\n\n",
        );

        prompt.push_str("Example:\n");
        prompt.push_str(&format!("Instruction: {}\n", quote(EXAMPLE_INSTRUCTION)));
        prompt.push_str("Response:\n[\n");
        let example: Vec<String> = EXAMPLE_PLAN.iter().map(|c| format!("  {}", quote(c))).collect();
        prompt.push_str(&example.join(",\n"));
        prompt.push_str("\n]\n\n");

        prompt.push_str("DO NOT include any markdown, comments, or extra text. Only the JSON array.\n\n");
        prompt.push_str(&format!("User instruction: {}\n", quote(instruction)));
        prompt
    }
}

fn render_doc(doc: &CommandDoc) -> String {
    if doc.hint.is_empty() {
        doc.signature.to_string()
    } else {
        format!("{}  ({})", doc.signature, doc.hint)
    }
}

fn is_browser_command(name: &str) -> bool {
    matches!(
        name,
        "navigate" | "clickSelector" | "typeSelector" | "extractTable" | "screenshotRegion" | "orderFlow"
    )
}

fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::extract;

    #[test]
    fn test_default_lists_desktop_commands_only() {
        let builder = PromptBuilder::new();
        assert_eq!(builder.commands().len(), 23);
        assert!(builder.commands().iter().all(|c| !c.starts_with("navigate")));
    }

    #[test]
    fn test_instruction_is_quoted() {
        let prompt = PromptBuilder::new().build(r#"type "hello""#);
        assert!(prompt.contains(r#"User instruction: "type \"hello\"""#));
    }

    #[test]
    fn test_example_plan_is_extractable() {
        let prompt = PromptBuilder::new().build("x");
        let start = prompt.find("Response:").unwrap();
        let end = prompt.find("DO NOT").unwrap();
        let plan = extract(&prompt[start..end]).unwrap();
        assert_eq!(plan.len(), EXAMPLE_PLAN.len());
        assert_eq!(plan.entries()[0], r#"runAppByName("Microsoft Edge")"#);
    }

    #[test]
    fn test_for_registry_lists_registered_commands() {
        let mut registry = ActionRegistry::new();
        registry
            .register_fn("wait", |_| async { Ok(None) })
            .register_fn("custom", |_| async { Ok(None) });

        let builder = PromptBuilder::for_registry(&registry);
        assert_eq!(builder.commands(), &["custom(...)".to_string(), "wait(ms)".to_string()]);
    }
}
