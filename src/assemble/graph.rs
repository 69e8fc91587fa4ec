use std::fmt;
use std::path::Path;

use crate::assemble::options::VideoOptions;
use crate::foundation::time::TimeSpan;
use crate::style::alignment::Alignment;

/// One ffmpeg filter with positional and named options.
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    /// Filter name, e.g. `trim`.
    pub name: String,
    /// Options in order; `None` keys are positional.
    pub args: Vec<(Option<String>, String)>,
}

impl Filter {
    /// Filter without options.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Append a positional option.
    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.args.push((None, value.into()));
        self
    }

    /// Append a `key=value` option.
    pub fn opt(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.push((Some(key.into()), value.into()));
        self
    }
}

impl fmt::Display for Filter {
    /// Renders with both escaping levels applied: option values first, then the
    /// filter description as a whole for the graph parser.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut desc = self.name.clone();
        for (i, (key, value)) in self.args.iter().enumerate() {
            desc.push(if i == 0 { '=' } else { ':' });
            if let Some(key) = key {
                desc.push_str(key);
                desc.push('=');
            }
            desc.push_str(&escape_option_value(value));
        }
        f.write_str(&escape_graph(&desc))
    }
}

/// Linear chain of filters between labelled pads.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterChain {
    /// Input pad labels, without brackets.
    pub inputs: Vec<String>,
    /// Filters applied in order.
    pub filters: Vec<Filter>,
    /// Output pad label, without brackets.
    pub output: String,
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for input in &self.inputs {
            write!(f, "[{input}]")?;
        }
        for (i, filter) in self.filters.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{filter}")?;
        }
        write!(f, "[{}]", self.output)
    }
}

/// `-filter_complex` value: chains separated by `;`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterGraph {
    /// Chains in order.
    pub chains: Vec<FilterChain>,
}

impl fmt::Display for FilterGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chain) in self.chains.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{chain}")?;
        }
        Ok(())
    }
}

/// Output pad carrying the finished picture.
pub const VIDEO_OUT: &str = "vout";
/// Output pad carrying the finished narration.
pub const AUDIO_OUT: &str = "aout";

/// Inputs to [`build_render_graph`].
#[derive(Clone, Debug)]
pub struct RenderGraphParams<'a> {
    /// Window of the background (input 0) to keep.
    pub window: TimeSpan,
    /// ASS artifact to burn in.
    pub subtitles_path: &'a Path,
    /// Directory libass searches for fonts.
    pub fonts_dir: &'a Path,
    /// Alignment forced over the artifact's style.
    pub alignment_override: Option<Alignment>,
    /// Fade lengths.
    pub options: &'a VideoOptions,
    /// Center-crop to 9:16 and scale to this frame size.
    pub portrait: Option<(u32, u32)>,
}

/// Build the render graph: background from input 0, narration from input 1.
///
/// Pure; the same parameters always render to the same string.
pub fn build_render_graph(p: &RenderGraphParams<'_>) -> FilterGraph {
    let duration = p.window.duration().max(0.0);

    let mut video = vec![
        Filter::new("trim")
            .opt("start", secs(p.window.start))
            .opt("duration", secs(duration)),
        Filter::new("setpts").arg("PTS-STARTPTS"),
    ];
    if let Some((w, h)) = p.portrait {
        video.push(
            Filter::new("crop")
                .opt("w", "if(gt(iw/ih,9/16),ih*9/16,iw)")
                .opt("h", "if(gt(iw/ih,9/16),ih,iw*16/9)"),
        );
        video.push(Filter::new("scale").opt("w", w.to_string()).opt("h", h.to_string()));
        video.push(Filter::new("setsar").arg("1"));
    }
    let mut subs = Filter::new("subtitles")
        .opt("filename", p.subtitles_path.to_string_lossy())
        .opt("fontsdir", p.fonts_dir.to_string_lossy());
    if let Some(a) = p.alignment_override {
        subs = subs.opt("force_style", format!("Alignment={}", a.ass_code()));
    }
    video.push(subs);
    video.extend(fades("fade", duration, p.options.video_fadein, p.options.video_fadeout));

    let mut audio = vec![
        Filter::new("atrim").opt("duration", secs(duration)),
        Filter::new("asetpts").arg("PTS-STARTPTS"),
    ];
    audio.extend(fades("afade", duration, p.options.audio_fadein, p.options.audio_fadeout));

    FilterGraph {
        chains: vec![
            FilterChain {
                inputs: vec!["0:v".into()],
                filters: video,
                output: VIDEO_OUT.into(),
            },
            FilterChain {
                inputs: vec!["1:a".into()],
                filters: audio,
                output: AUDIO_OUT.into(),
            },
        ],
    }
}

/// Fade-in at 0 and fade-out ending at `duration`; zero-length fades are omitted.
fn fades(name: &str, duration: f64, fade_in: f64, fade_out: f64) -> Vec<Filter> {
    let mut out = Vec::new();
    let fade_in = fade_in.min(duration);
    if fade_in > 0.0 {
        out.push(
            Filter::new(name)
                .opt("t", "in")
                .opt("st", secs(0.0))
                .opt("d", secs(fade_in)),
        );
    }
    let fade_out = fade_out.min(duration);
    if fade_out > 0.0 {
        out.push(
            Filter::new(name)
                .opt("t", "out")
                .opt("st", secs((duration - fade_out).max(0.0)))
                .opt("d", secs(fade_out)),
        );
    }
    out
}

fn secs(v: f64) -> String {
    format!("{v:.3}")
}

/// First escaping level: a single option value.
pub(crate) fn escape_option_value(v: &str) -> String {
    escape_chars(v, &['\\', '\'', ':'])
}

/// Second escaping level: a filter description inside a graph.
pub(crate) fn escape_graph(v: &str) -> String {
    escape_chars(v, &['\\', '\'', '[', ']', ',', ';'])
}

fn escape_chars(v: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(v.len());
    for c in v.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/assemble/graph.rs"]
mod tests;
