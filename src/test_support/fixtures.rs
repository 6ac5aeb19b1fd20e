//! Canned inputs shared by unit tests.
//!
//! The catalogue and scope texts here are the same shapes the CLI reads from
//! disk, so tests can either parse them directly or write them to a temp dir.

use std::path::{Path, PathBuf};

/// Framework API descriptors.
pub mod catalogues {
    /// One widget class with a small surface and an empty helper.
    pub const WIDGET: &str = "\
Landroid/widget/Widget; 2 1
    M Landroid/widget/Widget;.<init>:()V
    M Landroid/widget/Widget;.draw:()V
    F Landroid/widget/Widget;.count:I
Landroid/widget/Helper; 0 0
";

    /// A small widget toolkit: `Button` and `Label` extend `Widget`.
    pub const TOOLKIT: &str = "\
Landroid/widget/Widget; 2 1
    M Landroid/widget/Widget;.<init>:()V
    M Landroid/widget/Widget;.draw:()V
    F Landroid/widget/Widget;.count:I
Landroid/widget/Helper; 0 0
Landroid/widget/Button; 1 0
    M Landroid/widget/Button;.press:()V
Landroid/widget/Label; 0 0
";
}

/// Program scopes in the JSON scope format.
pub mod scopes {
    /// Release copies of the [`super::catalogues::TOOLKIT`] classes.
    ///
    /// `Button` declares `click()` which the framework lacks, so it drops in
    /// the first pass and takes `Label` with it in the second. `Widget` and
    /// `Helper` survive.
    pub const TOOLKIT: &str = r#"{
  "classes": [
    {
      "type": "Ljava/lang/Object;",
      "access": ["public"],
      "external": true
    },
    {
      "type": "Landroidx/widget/Helper;",
      "super": "Ljava/lang/Object;",
      "access": ["public", "interface", "abstract"]
    },
    {
      "type": "Landroidx/widget/Widget;",
      "super": "Ljava/lang/Object;",
      "interfaces": ["Landroidx/widget/Helper;"],
      "access": ["public"],
      "methods": [
        { "sig": "Landroidx/widget/Widget;.<init>:()V", "access": ["public"] },
        { "sig": "Landroidx/widget/Widget;.draw:()V", "access": ["public"], "virtual": true },
        { "sig": "Landroidx/widget/Widget;.layout:()V", "access": ["private"] }
      ],
      "fields": [
        { "sig": "Landroidx/widget/Widget;.count:I", "access": ["public"] }
      ]
    },
    {
      "type": "Landroidx/widget/Button;",
      "super": "Landroidx/widget/Widget;",
      "access": ["public"],
      "methods": [
        { "sig": "Landroidx/widget/Button;.press:()V", "access": ["public"], "virtual": true },
        { "sig": "Landroidx/widget/Button;.click:()V", "access": ["public"], "virtual": true }
      ]
    },
    {
      "type": "Landroidx/widget/Label;",
      "super": "Landroidx/widget/Button;",
      "access": ["public"]
    }
  ]
}
"#;
}

/// Paths of a catalogue/scope pair written to disk.
#[derive(Debug, Clone)]
pub struct InputFiles {
    pub catalogue: PathBuf,
    pub scope: PathBuf,
}

/// Write the toolkit catalogue and scope into `dir`.
pub fn write_toolkit(dir: &Path) -> InputFiles {
    let files = InputFiles {
        catalogue: dir.join("framework_api.txt"),
        scope: dir.join("scope.json"),
    };
    std::fs::write(&files.catalogue, catalogues::TOOLKIT).unwrap();
    std::fs::write(&files.scope, scopes::TOOLKIT).unwrap();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::FrameworkCatalogue;
    use crate::core::Scope;

    #[test]
    fn test_fixtures_parse() {
        assert_eq!(FrameworkCatalogue::parse(catalogues::TOOLKIT).unwrap().len(), 4);
        assert_eq!(Scope::from_json(scopes::TOOLKIT).unwrap().len(), 5);
    }
}
