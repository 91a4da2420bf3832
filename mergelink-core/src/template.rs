//! Build note templates
//!
//! Notes posted on a merge request are rendered from one of three
//! configured templates, picked by the build outcome. Templates reference
//! build metadata through `#build.<field>#` placeholders.

use serde::{Deserialize, Serialize};

use crate::domain::build::BuildOutcome;

pub const BUILD_DURATION: &str = "#build.duration#";
pub const BUILD_EXT_ID: &str = "#build.ext_id#";
pub const BUILD_FULL_NAME: &str = "#build.full_name#";
pub const BUILD_URL: &str = "#build.url#";
pub const BUILD_NUMBER: &str = "#build.number#";

/// Recognised placeholders, in the order they are tried
pub const PLACEHOLDERS: [&str; 5] = [
    BUILD_DURATION,
    BUILD_EXT_ID,
    BUILD_FULL_NAME,
    BUILD_URL,
    BUILD_NUMBER,
];

/// Values substituted for the build placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildVariables {
    pub duration: String,
    pub ext_id: String,
    pub full_name: String,
    /// Absolute build URL (executor root URL + relative build path)
    pub url: String,
    pub number: String,
}

impl BuildVariables {
    fn resolvers(&self) -> [(&'static str, &str); 5] {
        [
            (BUILD_DURATION, self.duration.as_str()),
            (BUILD_EXT_ID, self.ext_id.as_str()),
            (BUILD_FULL_NAME, self.full_name.as_str()),
            (BUILD_URL, self.url.as_str()),
            (BUILD_NUMBER, self.number.as_str()),
        ]
    }
}

/// Renders a template against build variables
///
/// Single left-to-right pass with literal matching. Substituted values are
/// copied as-is and never scanned again, and anything that is not a
/// recognised placeholder (including stray `#`) is kept verbatim.
pub fn render(template: &str, vars: &BuildVariables) -> String {
    let resolvers = vars.resolvers();
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('#') {
        rendered.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        match resolvers
            .iter()
            .find(|(placeholder, _)| tail.starts_with(placeholder))
        {
            Some((placeholder, value)) => {
                rendered.push_str(value);
                rest = &tail[placeholder.len()..];
            }
            None => {
                rendered.push('#');
                rest = &tail[1..];
            }
        }
    }

    rendered.push_str(rest);
    rendered
}

/// The three note templates, one per outcome bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplates {
    pub success: String,
    pub unstable: String,
    pub failure: String,
}

impl MessageTemplates {
    /// Picks the template for a build outcome
    ///
    /// Anything that is neither success nor unstable (failed, aborted, not
    /// built, or no result at all) uses the failure template.
    pub fn for_outcome(&self, outcome: Option<BuildOutcome>) -> &str {
        match outcome {
            Some(BuildOutcome::Success) => &self.success,
            Some(BuildOutcome::Unstable) => &self.unstable,
            _ => &self.failure,
        }
    }
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            success: "Build #build.full_name# succeeded in #build.duration#.\n\n#build.url#"
                .to_string(),
            unstable: "Build #build.full_name# is unstable (#build.duration#).\n\n#build.url#"
                .to_string(),
            failure: "Build #build.full_name# failed after #build.duration#.\n\n#build.url#"
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_vars() -> BuildVariables {
        BuildVariables {
            duration: "3 min 10 sec".to_string(),
            ext_id: "app#42".to_string(),
            full_name: "app #42".to_string(),
            url: "https://ci.example.com/job/app/42/".to_string(),
            number: "42".to_string(),
        }
    }

    #[test]
    fn test_render_scenario() {
        let rendered = render(
            "Build #build.number# finished in #build.duration#",
            &sample_vars(),
        );
        assert_eq!(rendered, "Build 42 finished in 3 min 10 sec");
    }

    #[test]
    fn test_render_all_placeholders() {
        let template = PLACEHOLDERS.join(" | ");
        let rendered = render(&template, &sample_vars());

        assert_eq!(
            rendered,
            "3 min 10 sec | app#42 | app #42 | https://ci.example.com/job/app/42/ | 42"
        );
        for placeholder in PLACEHOLDERS {
            assert!(!rendered.contains(placeholder));
        }
    }

    #[test]
    fn test_render_repeated_placeholder() {
        let rendered = render("#build.number#/#build.number#", &sample_vars());
        assert_eq!(rendered, "42/42");
    }

    #[test]
    fn test_render_keeps_unknown_placeholders() {
        let rendered = render("#unknown.thing# on #build.number#", &sample_vars());
        assert_eq!(rendered, "#unknown.thing# on 42");
    }

    #[test]
    fn test_render_keeps_malformed_placeholders() {
        let vars = sample_vars();
        assert_eq!(render("#build.number", &vars), "#build.number");
        assert_eq!(render("build.number#", &vars), "build.number#");
        assert_eq!(render("##build.number##", &vars), "#42#");
        assert_eq!(render("#", &vars), "#");
        assert_eq!(render("", &vars), "");
    }

    #[test]
    fn test_render_does_not_expand_values() {
        let vars = BuildVariables {
            full_name: "evil #build.number# $1 \\0".to_string(),
            ..sample_vars()
        };

        let rendered = render("#build.full_name# / #build.number#", &vars);
        assert_eq!(rendered, "evil #build.number# $1 \\0 / 42");
    }

    #[test]
    fn test_render_is_idempotent() {
        let template = "Build #build.ext_id# (#build.url#) #build.nope#";
        let vars = sample_vars();
        assert_eq!(render(template, &vars), render(template, &vars));
    }

    #[test]
    fn test_render_non_ascii() {
        let rendered = render("✅ #build.number# ✅", &sample_vars());
        assert_eq!(rendered, "✅ 42 ✅");
    }

    #[test]
    fn test_for_outcome_buckets() {
        let templates = MessageTemplates {
            success: "ok".to_string(),
            unstable: "meh".to_string(),
            failure: "bad".to_string(),
        };

        assert_eq!(templates.for_outcome(Some(BuildOutcome::Success)), "ok");
        assert_eq!(templates.for_outcome(Some(BuildOutcome::Unstable)), "meh");
        assert_eq!(templates.for_outcome(Some(BuildOutcome::Failure)), "bad");
        assert_eq!(templates.for_outcome(Some(BuildOutcome::Aborted)), "bad");
        assert_eq!(templates.for_outcome(Some(BuildOutcome::NotBuilt)), "bad");
        assert_eq!(templates.for_outcome(None), "bad");
    }
}
