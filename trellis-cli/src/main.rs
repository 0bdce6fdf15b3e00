//! Trellis CLI
//!
//! Builds a layout tree from a JSON document description and prints it.
//!
//! A description looks like:
//!
//! ```json
//! {
//!   "css": ".card { position: relative; z-index: 1 }",
//!   "config": { "viewport": { "x": 0, "y": 0, "width": 1024, "height": 768 } },
//!   "nodes": [
//!     { "tag": "html", "children": [
//!       { "tag": "body", "children": ["Hello", { "tag": "div", "attrs": { "class": "card" } }] }
//!     ] }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use serde::Deserialize;
use trellis_dom::{ContentNodeId, ContentTree, ElementData};
use trellis_layout::{
    LayoutConfig, LayoutTree, PositioningMap, TreeBuilder, build_stacking_contexts, dump_tree, render_text,
    resolve,
};
use trellis_style::{ScaledFontCache, StyleMap};
use tracing_subscriber::EnvFilter;

/// Trellis: inspect layout trees
#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the layout tree after anonymous box synthesis
    trellis demos/card.json

    # Print the stacking contexts in paint order
    trellis --stacking demos/card.json

    # Dump the tree as JSON with a 2x device scale
    trellis --json --scale 2 demos/card.json

    # Trace the resolver
    trellis -vv demos/card.json
"#)]
struct Cli {
    /// Path to a JSON document description
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Print the tree as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Print stacking contexts in paint order
    #[arg(long)]
    stacking: bool,

    /// Device pixels per CSS pixel (overrides the description)
    #[arg(long, value_name = "RATIO")]
    scale: Option<f32>,

    /// Viewport width in CSS pixels (overrides the description)
    #[arg(long)]
    width: Option<f32>,

    /// Viewport height in CSS pixels (overrides the description)
    #[arg(long)]
    height: Option<f32>,

    /// Log more (-v: debug, -vv: trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Top-level document description.
#[derive(Debug, Deserialize)]
struct DocumentDescription {
    #[serde(default)]
    css: String,
    #[serde(default)]
    config: Option<LayoutConfig>,
    #[serde(default)]
    nodes: Vec<NodeDescription>,
}

/// A bare string is a text node.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NodeDescription {
    Text(String),
    Element {
        tag: String,
        #[serde(default)]
        svg: bool,
        #[serde(default)]
        attrs: BTreeMap<String, String>,
        #[serde(default)]
        children: Vec<NodeDescription>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let text = fs::read_to_string(&cli.path)
        .with_context(|| format!("reading {}", cli.path.display()))?;
    let description: DocumentDescription =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", cli.path.display()))?;

    let mut config = description.config.unwrap_or_default();
    if let Some(scale) = cli.scale {
        config = config.with_device_pixels_per_css_pixel(scale);
    }
    if cli.width.is_some() || cli.height.is_some() {
        config = config.with_viewport_size(
            cli.width.unwrap_or(config.viewport.width),
            cli.height.unwrap_or(config.viewport.height),
        );
    }

    let mut content = ContentTree::new();
    let document = content.document();
    for node in &description.nodes {
        append_node(&mut content, document, node);
    }

    let styles = StyleMap::parse(&description.css).context("parsing stylesheet")?;
    let mut fonts = ScaledFontCache::new();
    let mut tree = TreeBuilder::new(&content, &styles, &mut fonts, config)
        .build()
        .context("building layout tree")?;
    let positioning = resolve(&mut tree).context("resolving layout tree")?;
    tracing::debug!(layout_nodes = tree.len(), content_nodes = content.len(), "document resolved");

    let Some(viewport) = tree.viewport() else {
        anyhow::bail!("layout tree has no viewport");
    };

    if cli.json {
        let dump = dump_tree(&tree, viewport, &content, &positioning);
        println!("{}", serde_json::to_string_pretty(&dump)?);
    } else if cli.stacking {
        print_stacking(&tree, &positioning, &content);
    } else {
        print_layout(&tree, &content, &config);
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "trellis_layout=debug",
        _ => "trellis_layout=trace,trellis_style=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn append_node(content: &mut ContentTree, parent: ContentNodeId, node: &NodeDescription) {
    match node {
        NodeDescription::Text(text) => {
            let _ = content.append_text(parent, text);
        }
        NodeDescription::Element {
            tag,
            svg,
            attrs,
            children,
        } => {
            let mut data = if *svg { ElementData::svg(tag) } else { ElementData::html(tag) };
            for (name, value) in attrs {
                data = data.with_attr(name, value);
            }
            let element = content.append_element(parent, data);
            for child in children {
                append_node(content, element, child);
            }
        }
    }
}

fn print_layout(tree: &LayoutTree, content: &ContentTree, config: &LayoutConfig) {
    let Some(viewport) = tree.viewport() else {
        return;
    };
    let anonymous = tree
        .inclusive_descendants(viewport)
        .filter(|&id| tree.node(id).is_anonymous())
        .count();
    println!(
        "{}",
        format!(
            "=== Layout Tree (viewport: {}x{}, scale {}) ===",
            config.viewport.width, config.viewport.height, config.device_pixels_per_css_pixel
        )
        .bold()
    );
    print!("{}", render_text(tree, viewport, content));
    println!(
        "\n{} nodes, {} anonymous",
        tree.len().cyan(),
        anonymous.cyan()
    );
}

fn print_stacking(tree: &LayoutTree, positioning: &PositioningMap, content: &ContentTree) {
    println!("{}", "=== Paint Order ===".bold());
    let Some(root) = build_stacking_contexts(tree, positioning) else {
        println!("No stacking contexts");
        return;
    };
    for (index, id) in root.paint_order().into_iter().enumerate() {
        let z_index = tree
            .computed_values(id)
            .z_index
            .map_or_else(|| "auto".to_string(), |z| z.to_string());
        println!(
            "{:>3}. {} {}",
            index + 1,
            tree.debug_description(id, content),
            format!("z-index: {z_index}").dimmed()
        );
    }
    let skipped = root.len() - root.paint_order().len();
    if skipped > 0 {
        println!("{}", format!("{skipped} contexts skipped (singular transform)").yellow());
    }
}
