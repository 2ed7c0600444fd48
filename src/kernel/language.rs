#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum LanguageId {
    Rust,
    Go,
    Python,
    JavaScript,
    TypeScript,
    C,
    Cpp,
    Java,
    Kotlin,
    CSharp,
    Ruby,
    Php,
    Swift,
    Lua,
    Html,
    Css,
    Scss,
    Json,
    Yaml,
    Toml,
    Xml,
    Markdown,
    Shell,
    PowerShell,
    Sql,
    Dockerfile,
    Makefile,
    Ini,
    PlainText,
}

impl LanguageId {
    /// Classify by file name: well-known file names first, then extension,
    /// defaulting to plain text.
    pub fn from_filename(name: &str) -> Self {
        let basename = name.rsplit(['/', '\\']).next().unwrap_or(name);

        match basename {
            "Dockerfile" => return Self::Dockerfile,
            "Makefile" | "makefile" => return Self::Makefile,
            "Gemfile" | "Rakefile" | "Vagrantfile" | "Brewfile" => return Self::Ruby,
            "Cargo.toml" => return Self::Toml,
            "package.json" | "tsconfig.json" | "jsconfig.json" | "composer.json" => {
                return Self::Json
            }
            ".editorconfig" => return Self::Ini,
            _ => {}
        }

        let ext = match basename.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
            _ => return Self::PlainText,
        };

        match ext.as_str() {
            "rs" => Self::Rust,
            "go" => Self::Go,
            "py" | "pyw" | "pyi" => Self::Python,
            "js" | "jsx" | "mjs" | "cjs" => Self::JavaScript,
            "ts" | "tsx" | "mts" | "cts" => Self::TypeScript,
            "c" | "h" => Self::C,
            "cc" | "cpp" | "cxx" | "hpp" | "hxx" => Self::Cpp,
            "java" => Self::Java,
            "kt" | "kts" => Self::Kotlin,
            "cs" => Self::CSharp,
            "rb" => Self::Ruby,
            "php" => Self::Php,
            "swift" => Self::Swift,
            "lua" => Self::Lua,
            "html" | "htm" => Self::Html,
            "css" | "less" => Self::Css,
            "scss" | "sass" => Self::Scss,
            "json" | "jsonc" => Self::Json,
            "yaml" | "yml" => Self::Yaml,
            "toml" => Self::Toml,
            "xml" | "svg" => Self::Xml,
            "md" | "mdx" => Self::Markdown,
            "sh" | "bash" | "zsh" | "fish" => Self::Shell,
            "ps1" | "psm1" => Self::PowerShell,
            "sql" => Self::Sql,
            "dockerfile" => Self::Dockerfile,
            "ini" | "conf" | "cfg" => Self::Ini,
            _ => Self::PlainText,
        }
    }

    pub fn language_id(self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::Go => "go",
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::Java => "java",
            Self::Kotlin => "kotlin",
            Self::CSharp => "csharp",
            Self::Ruby => "ruby",
            Self::Php => "php",
            Self::Swift => "swift",
            Self::Lua => "lua",
            Self::Html => "html",
            Self::Css => "css",
            Self::Scss => "scss",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Xml => "xml",
            Self::Markdown => "markdown",
            Self::Shell => "shell",
            Self::PowerShell => "powershell",
            Self::Sql => "sql",
            Self::Dockerfile => "dockerfile",
            Self::Makefile => "makefile",
            Self::Ini => "ini",
            Self::PlainText => "plaintext",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/language.rs"]
mod tests;
