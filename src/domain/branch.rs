use regex::Regex;

use super::tag::TagTemplate;

/// How a branch rule decides whether it applies to a branch name
#[derive(Debug, Clone)]
pub enum BranchMatcher {
    /// Branch name equals the given name
    Exact(String),
    /// Branch name starts with the given prefix
    Prefix(String),
    /// Branch name matches the regular expression
    Pattern(Regex),
    /// Matches every branch
    Any,
}

impl BranchMatcher {
    pub fn matches(&self, branch: &str) -> bool {
        match self {
            BranchMatcher::Exact(name) => branch == name,
            BranchMatcher::Prefix(prefix) => branch.starts_with(prefix.as_str()),
            BranchMatcher::Pattern(re) => re.is_match(branch),
            BranchMatcher::Any => true,
        }
    }
}

/// One row of the branch table: which branches, and which dist-tag they publish under
#[derive(Debug, Clone)]
pub struct BranchRule {
    pub matcher: BranchMatcher,
    pub template: TagTemplate,
}

impl BranchRule {
    pub fn new(matcher: BranchMatcher, template: impl Into<String>) -> Self {
        BranchRule {
            matcher,
            template: TagTemplate::new(template),
        }
    }
}

/// Ordered branch-to-dist-tag rules; the first matching rule wins
#[derive(Debug, Clone)]
pub struct BranchTable {
    rules: Vec<BranchRule>,
}

impl BranchTable {
    pub fn new(rules: Vec<BranchRule>) -> Self {
        BranchTable { rules }
    }

    /// Find the rule for a branch
    pub fn resolve(&self, branch: &str) -> Option<&BranchRule> {
        self.rules.iter().find(|rule| rule.matcher.matches(branch))
    }

    pub fn rules(&self) -> &[BranchRule] {
        &self.rules
    }
}

impl Default for BranchTable {
    /// master -> latest, develop -> next, dev-* -> itself, anything else -> <branch>-branch<version>
    fn default() -> Self {
        BranchTable::new(vec![
            BranchRule::new(BranchMatcher::Exact("master".to_string()), "latest"),
            BranchRule::new(BranchMatcher::Exact("develop".to_string()), "next"),
            BranchRule::new(BranchMatcher::Prefix("dev-".to_string()), "{branch}"),
            BranchRule::new(BranchMatcher::Any, "{branch}-branch{version}"),
        ])
    }
}
