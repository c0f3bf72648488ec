//! Build constraints: `//go:build` expressions, legacy `// +build` lines
//! and `_GOOS`/`_GOARCH` file name suffixes.

const KNOWN_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "js", "linux",
    "nacl", "netbsd", "openbsd", "plan9", "solaris", "wasip1", "windows", "zos",
];

const UNIX_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "linux",
    "netbsd", "openbsd", "solaris",
];

const KNOWN_ARCH: &[&str] = &[
    "386", "amd64", "amd64p32", "arm", "armbe", "arm64", "arm64be", "loong64", "mips", "mipsle",
    "mips64", "mips64le", "mips64p32", "mips64p32le", "ppc", "ppc64", "ppc64le", "riscv",
    "riscv64", "s390", "s390x", "sparc", "sparc64", "wasm",
];

/// Target platform and tags used to decide which files belong to a build
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub goos: String,
    pub goarch: String,
    pub tags: Vec<String>,
}

impl Default for BuildContext {
    fn default() -> Self {
        Self {
            goos: "linux".to_string(),
            goarch: "amd64".to_string(),
            tags: vec!["gc".to_string(), "cgo".to_string()],
        }
    }
}

impl BuildContext {
    /// Whether a single build tag is satisfied
    pub fn matches_tag(&self, tag: &str) -> bool {
        if tag == self.goos || tag == self.goarch {
            return true;
        }
        if tag == "unix" {
            return UNIX_OS.contains(&self.goos.as_str());
        }
        // release tags: every go1.N is considered available
        if let Some(minor) = tag.strip_prefix("go1.") {
            return !minor.is_empty() && minor.bytes().all(|b| b.is_ascii_digit());
        }
        self.tags.iter().any(|t| t == tag)
    }

    /// Apply the `name_GOOS_GOARCH.go` convention
    pub fn matches_file_name(&self, name: &str) -> bool {
        let stem = name.strip_suffix(".go").unwrap_or(name);
        let stem = stem.strip_suffix("_test").unwrap_or(stem);
        let Some(idx) = stem.find('_') else {
            return true;
        };
        let parts: Vec<&str> = stem[idx..].split('_').collect();
        let n = parts.len();
        if n >= 2 && KNOWN_OS.contains(&parts[n - 2]) && KNOWN_ARCH.contains(&parts[n - 1]) {
            return parts[n - 2] == self.goos && parts[n - 1] == self.goarch;
        }
        let last = parts[n - 1];
        if KNOWN_OS.contains(&last) {
            return last == self.goos;
        }
        if KNOWN_ARCH.contains(&last) {
            return last == self.goarch;
        }
        true
    }

    /// Evaluate the constraint lines found in a file header.
    ///
    /// A `//go:build` line takes precedence; legacy `// +build` lines are
    /// only consulted when it is absent. `ignore` is never satisfied.
    pub fn satisfies(&self, constraints: &Constraints) -> Result<bool, String> {
        if let Some(expr) = &constraints.go_build {
            return eval_expr(expr, self);
        }
        Ok(constraints.plus_build.iter().all(|line| eval_plus_build(line, self)))
    }
}

/// Constraint lines collected from a file header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constraints {
    pub go_build: Option<String>,
    pub plus_build: Vec<String>,
}

fn eval_plus_build(line: &str, ctx: &BuildContext) -> bool {
    line.split_whitespace().any(|option| {
        option.split(',').all(|term| match term.strip_prefix('!') {
            Some(tag) => !ctx.matches_tag(tag),
            None => ctx.matches_tag(term),
        })
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Not,
    And,
    Or,
    Open,
    Close,
    Tag(&'a str),
}

fn tokenize(expr: &str) -> Result<Vec<Token<'_>>, String> {
    let mut tokens = Vec::new();
    let bytes = expr.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b' ' | b'\t' => i += 1,
            b'!' => {
                tokens.push(Token::Not);
                i += 1;
            }
            b'(' => {
                tokens.push(Token::Open);
                i += 1;
            }
            b')' => {
                tokens.push(Token::Close);
                i += 1;
            }
            b'&' if bytes.get(i + 1) == Some(&b'&') => {
                tokens.push(Token::And);
                i += 2;
            }
            b'|' if bytes.get(i + 1) == Some(&b'|') => {
                tokens.push(Token::Or);
                i += 2;
            }
            b if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_' || bytes[i] == b'.') {
                    i += 1;
                }
                tokens.push(Token::Tag(&expr[start..i]));
            }
            other => return Err(format!("invalid character {:?} in //go:build expression", other as char)),
        }
    }
    Ok(tokens)
}

/// Upper bound on negations, groups and tags in one expression. Parsing
/// recurses per `!` and `(`, so deeper input is rejected up front.
const MAX_EXPR_SIZE: usize = 1000;

struct ExprParser<'a, 'c> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    size: usize,
    ctx: &'c BuildContext,
}

impl ExprParser<'_, '_> {
    fn peek(&self) -> Option<&Token<'_>> {
        self.tokens.get(self.pos)
    }

    fn or(&mut self) -> Result<bool, String> {
        let mut value = self.and()?;
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            let rhs = self.and()?;
            value = value || rhs;
        }
        Ok(value)
    }

    fn and(&mut self) -> Result<bool, String> {
        let mut value = self.unary()?;
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            let rhs = self.unary()?;
            value = value && rhs;
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<bool, String> {
        self.size += 1;
        if self.size > MAX_EXPR_SIZE {
            return Err("//go:build expression too complex".to_string());
        }
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        match token {
            Some(Token::Not) => Ok(!self.unary()?),
            Some(Token::Open) => {
                let value = self.or()?;
                if self.peek() != Some(&Token::Close) {
                    return Err("missing ) in //go:build expression".to_string());
                }
                self.pos += 1;
                Ok(value)
            }
            Some(Token::Tag(tag)) => Ok(self.ctx.matches_tag(tag)),
            _ => Err("unexpected token in //go:build expression".to_string()),
        }
    }
}

fn eval_expr(expr: &str, ctx: &BuildContext) -> Result<bool, String> {
    let tokens = tokenize(expr)?;
    let mut parser = ExprParser { tokens, pos: 0, size: 0, ctx };
    let value = parser.or()?;
    if parser.pos != parser.tokens.len() {
        return Err("unexpected trailing tokens in //go:build expression".to_string());
    }
    Ok(value)
}
