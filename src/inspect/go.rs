//! Go package inspector
//!
//! Reads only what the catalog needs from each `.go` file: the build
//! constraints and doc comment ahead of the package clause, the package
//! name, and the import declarations. Files are parsed with tree-sitter;
//! syntax errors past the import block do not affect the result.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tracing::debug;
use tree_sitter::{Node, Parser};

use super::constraint::{BuildContext, Constraints};
use super::{is_source_file, BuildInspector, InspectError};
use crate::model::SourcePackage;

/// Inspects directories of Go source files
#[derive(Debug, Clone, Default)]
pub struct GoInspector {
    context: BuildContext,
}

impl GoInspector {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Default)]
struct ImportSets {
    imports: BTreeSet<String>,
    test_imports: BTreeSet<String>,
    xtest_imports: BTreeSet<String>,
}

impl BuildInspector for GoInspector {
    fn inspect(&self, dir: &Path) -> Result<Option<SourcePackage>, InspectError> {
        let read_err = |source| InspectError::Read { path: dir.to_path_buf(), source };
        let mut names = Vec::new();
        for entry in fs::read_dir(dir).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if !is_source_file(&name) || name.starts_with('_') || name.starts_with('.') {
                continue;
            }
            if entry.path().is_file() {
                names.push(name);
            }
        }
        names.sort();

        let mut parser = go_parser()?;
        let mut pkg = SourcePackage::default();
        let mut first_file = String::new();
        let mut sets = ImportSets::default();

        for name in names {
            if !self.context.matches_file_name(&name) {
                debug!("excluding {} by file name", name);
                continue;
            }
            let path = dir.join(&name);
            let src = fs::read_to_string(&path).map_err(|source| InspectError::Read { path: path.clone(), source })?;
            let header = parse_header(&mut parser, &src).map_err(|(line, message)| InspectError::Syntax {
                file: path.display().to_string(),
                line,
                message,
            })?;

            let included = self.context.satisfies(&header.constraints).map_err(|message| InspectError::Syntax {
                file: path.display().to_string(),
                line: 1,
                message,
            })?;
            if !included || header.package == "documentation" {
                debug!("excluding {} by build constraint", name);
                continue;
            }

            let is_test = name.ends_with("_test.go");
            let mut package = header.package.as_str();
            let mut is_xtest = false;
            if is_test && package.ends_with("_test") && pkg.name != package {
                is_xtest = true;
                package = &package[..package.len() - "_test".len()];
            }

            if pkg.name.is_empty() {
                pkg.name = package.to_string();
                first_file = name.clone();
            } else if package != pkg.name {
                return Err(InspectError::MultiplePackages {
                    dir: dir.to_path_buf(),
                    first: pkg.name,
                    first_file,
                    second: package.to_string(),
                    second_file: name,
                });
            }

            if !is_test && pkg.doc.is_empty() && !header.doc.is_empty() {
                pkg.doc = synopsis(&header.doc);
            }

            let (files, imports) = if is_xtest {
                (&mut pkg.xtest_files, &mut sets.xtest_imports)
            } else if is_test {
                (&mut pkg.test_files, &mut sets.test_imports)
            } else {
                (&mut pkg.files, &mut sets.imports)
            };
            files.push(name);
            imports.extend(header.imports);
        }

        if pkg.files.is_empty() && pkg.test_files.is_empty() && pkg.xtest_files.is_empty() {
            return Ok(None);
        }

        pkg.imports = sets.imports.into_iter().collect();
        pkg.test_imports = sets.test_imports.into_iter().collect();
        pkg.xtest_imports = sets.xtest_imports.into_iter().collect();
        Ok(Some(pkg))
    }
}

/// Everything read from a file up to the end of its import declarations
#[derive(Debug, Default, PartialEq, Eq)]
struct Header {
    constraints: Constraints,
    doc: String,
    package: String,
    imports: Vec<String>,
}

type ParseResult<T> = Result<T, (usize, String)>;

fn go_parser() -> Result<Parser, InspectError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|e| InspectError::Grammar(e.to_string()))?;
    Ok(parser)
}

fn line_of(node: &Node<'_>) -> usize {
    node.start_position().row + 1
}

fn text<'s>(node: &Node<'_>, src: &'s str) -> &'s str {
    node.utf8_text(src.as_bytes()).unwrap_or("")
}

fn describe(text: &str) -> String {
    match text.split_whitespace().next() {
        Some(word) => format!("'{}'", word.chars().take(16).collect::<String>()),
        None => "EOF".to_string(),
    }
}

fn comment_text(raw: &str) -> String {
    if let Some(line) = raw.strip_prefix("//") {
        return line.strip_prefix(' ').unwrap_or(line).to_string();
    }
    let inner = raw.trim_start_matches("/*").trim_end_matches("*/");
    inner
        .lines()
        .map(|l| l.trim_start().trim_start_matches('*').trim_start())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Value of an interpreted or raw string literal, quotes removed
fn unquote(literal: &str) -> String {
    let inner = literal.get(1..literal.len().saturating_sub(1)).unwrap_or("");
    if literal.starts_with('`') {
        return inner.to_string();
    }
    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => value.extend(chars.next()),
            other => value.push(other),
        }
    }
    value
}

/// Comments ahead of the package clause: build constraints plus the doc
/// comment group, which must end on the line right above the clause.
#[derive(Default)]
struct Preamble {
    constraints: Constraints,
    group: Vec<String>,
    group_end: usize,
}

impl Preamble {
    fn comment(&mut self, raw: &str, start: usize, end: usize) {
        if let Some(expr) = raw.strip_prefix("//go:build") {
            self.constraints.go_build.get_or_insert_with(|| expr.trim().to_string());
            self.group.clear();
            return;
        }
        if let Some(tags) = raw.strip_prefix("//").map(str::trim_start).and_then(|l| l.strip_prefix("+build")) {
            self.constraints.plus_build.push(tags.trim().to_string());
            self.group.clear();
            return;
        }
        if start > self.group_end + 1 {
            self.group.clear();
        }
        if !raw.starts_with("//go:") && !raw.starts_with("//line ") {
            self.group.push(comment_text(raw));
        }
        self.group_end = end;
    }

    fn doc_for(&self, package_line: usize) -> String {
        if !self.group.is_empty() && self.group_end + 1 == package_line {
            self.group.join("\n")
        } else {
            String::new()
        }
    }
}

fn import_paths(decl: &Node<'_>, src: &str, imports: &mut Vec<String>) {
    let mut cursor = decl.walk();
    for child in decl.named_children(&mut cursor) {
        match child.kind() {
            "import_spec" => {
                if let Some(path) = child.child_by_field_name("path") {
                    imports.push(unquote(text(&path, src)));
                }
            }
            "import_spec_list" => import_paths(&child, src, imports),
            _ => {}
        }
    }
}

/// Read the file header from the syntax tree. Only the package clause and
/// the import declarations right after it have to be well formed; errors
/// further down the file are left to the compiler.
fn parse_header(parser: &mut Parser, src: &str) -> ParseResult<Header> {
    let src = src.strip_prefix('\u{feff}').unwrap_or(src);
    let tree = parser
        .parse(src, None)
        .ok_or_else(|| (1, "parser produced no syntax tree".to_string()))?;
    let root = tree.root_node();

    let mut preamble = Preamble::default();
    let mut package: Option<String> = None;
    let mut doc = String::new();
    let mut imports = Vec::new();

    let mut cursor = root.walk();
    for node in root.children(&mut cursor) {
        let line = line_of(&node);
        match (node.kind(), package.is_some()) {
            ("comment", false) => preamble.comment(text(&node, src), line, node.end_position().row + 1),
            ("comment", true) => {}
            ("package_clause", false) => {
                let mut inner = node.walk();
                let name = node
                    .named_children(&mut inner)
                    .find(|n| n.kind() == "package_identifier")
                    .map(|n| text(&n, src).to_string());
                match name {
                    Some(name) if !node.has_error() && !name.is_empty() => package = Some(name),
                    _ => return Err((line, format!("expected package name, found {}", describe(text(&node, src))))),
                }
                doc = preamble.doc_for(line);
            }
            (_, false) => {
                return Err((line, format!("expected 'package', found {}", describe(text(&node, src)))));
            }
            ("import_declaration", true) => {
                if node.has_error() {
                    return Err((line, "malformed import declaration".to_string()));
                }
                import_paths(&node, src, &mut imports);
            }
            // imports end at the first other declaration
            (_, true) => break,
        }
    }

    let Some(package) = package else {
        return Err((root.end_position().row + 1, "expected 'package', found EOF".to_string()));
    };
    Ok(Header {
        constraints: preamble.constraints,
        doc,
        package,
        imports,
    })
}

/// First sentence of a package comment with whitespace collapsed, or an
/// empty string for license boilerplate.
fn synopsis(doc: &str) -> String {
    let paragraph = doc.split("\n\n").next().unwrap_or("");
    let chars: Vec<char> = paragraph.chars().collect();
    let mut end = chars.len();
    for i in 0..chars.len() {
        if chars[i] != '.' {
            continue;
        }
        let next_is_space = chars.get(i + 1).is_none_or(|c| c.is_whitespace());
        let initial = i >= 2 && chars[i - 1].is_uppercase() && chars[i - 2] == ' ';
        if next_is_space && !initial {
            end = i + 1;
            break;
        }
    }
    let sentence: String = chars[..end].iter().collect();
    let collapsed = sentence.split_whitespace().collect::<Vec<_>>().join(" ");

    let lower = collapsed.to_lowercase();
    if ["copyright", "all rights", "author"].iter().any(|p| lower.starts_with(p)) {
        return String::new();
    }
    collapsed
}
