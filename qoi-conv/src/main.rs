use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, ensure, Context, Result};
use log::LevelFilter;
use qoi::{consts::QOI_FILE_EXTENSION, Channels, ColorSpace, RawImage};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use structopt::StructOpt;
use walkdir::{DirEntry, WalkDir};

fn timeit<T>(func: impl FnOnce() -> T) -> (T, Duration) {
    let t0 = Instant::now();
    let out = func();
    (out, t0.elapsed())
}

fn is_png(path: &Path) -> bool {
    path.extension().unwrap_or_default().to_string_lossy().to_ascii_lowercase() == "png"
}

fn find_pngs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut out = vec![];
    for path in paths {
        if path.is_file() {
            if is_png(path) {
                out.push(path.clone());
            } else {
                log::warn!("skipping non-PNG file: {}", path.display());
            }
        } else if path.is_dir() {
            for entry in WalkDir::new(path).follow_links(true).into_iter().filter_map(Result::ok) {
                let path = DirEntry::into_path(entry);
                if !path.is_file() {
                    continue;
                }
                if is_png(&path) {
                    out.push(path);
                } else {
                    log::debug!("skipping {}", path.display());
                }
            }
        } else {
            bail!("path doesn't exist: {}", path.display());
        }
    }
    Ok(out)
}

/// Widens grayscale samples to RGB, keeping alpha if present.
fn gray_to_rgb(data: &[u8], with_alpha: bool) -> Vec<u8> {
    if with_alpha {
        data.chunks_exact(2).flat_map(|px| [px[0], px[0], px[0], px[1]]).collect()
    } else {
        data.iter().flat_map(|&v| [v, v, v]).collect()
    }
}

fn read_png(filename: &Path, colorspace: ColorSpace) -> Result<RawImage> {
    let mut decoder = png::Decoder::new(File::open(filename)?);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    let (channels, pixels) = match info.color_type {
        png::ColorType::Rgb => (Channels::Rgb, buf),
        png::ColorType::Rgba => (Channels::Rgba, buf),
        png::ColorType::Grayscale => (Channels::Rgb, gray_to_rgb(&buf, false)),
        png::ColorType::GrayscaleAlpha => (Channels::Rgba, gray_to_rgb(&buf, true)),
        png::ColorType::Indexed => bail!("palette wasn't expanded"),
    };
    Ok(RawImage::new(info.width, info.height, channels, colorspace, pixels)?)
}

fn output_path(input: &Path, out_dir: Option<&Path>) -> Result<PathBuf> {
    let stem = input.file_stem().context("input path has no file name")?;
    let name = format!("{}.{}", stem.to_string_lossy(), QOI_FILE_EXTENSION);
    let dir = match out_dir {
        Some(dir) => dir,
        None => input.parent().unwrap_or_else(|| Path::new("")),
    };
    Ok(dir.join(name))
}

fn convert(input: &Path, args: &Args) -> Result<()> {
    let colorspace = if args.linear { ColorSpace::Linear } else { ColorSpace::Srgb };
    let img = read_png(input, colorspace).context("error reading PNG file")?;
    log::debug!(
        "{}: {}x{}:{}",
        input.display(),
        img.width(),
        img.height(),
        img.channels().as_u8()
    );

    let (encoded, t_encode) = timeit(|| img.encode());
    let encoded = encoded.context("error encoding QOI image")?;

    if args.verify {
        let decoded = qoi::decode(&encoded).context("error decoding QOI image")?;
        ensure!(decoded == img, "decoded image doesn't match the source");
    }

    let output = output_path(input, args.out_dir.as_deref())?;
    fs::write(&output, &encoded)
        .with_context(|| format!("error writing {}", output.display()))?;

    let size_png = fs::metadata(input)?.len() as f64 / 1024.;
    let size_qoi = encoded.len() as f64 / 1024.;
    log::info!(
        "{} -> {} ({}x{}:{}, {:.1} KB -> {:.1} KB, {:.2} ms)",
        input.display(),
        output.display(),
        img.width(),
        img.height(),
        img.channels().as_u8(),
        size_png,
        size_qoi,
        t_encode.as_secs_f64() * 1e3
    );
    Ok(())
}

/// Converts PNG images to QOI.
#[derive(Debug, StructOpt)]
struct Args {
    /// PNG files or directories to search for them
    #[structopt(parse(from_os_str))]
    paths: Vec<PathBuf>,
    /// Write output files here instead of next to the inputs
    #[structopt(short, long, parse(from_os_str))]
    out_dir: Option<PathBuf>,
    /// Mark images as having linear channels instead of sRGB
    #[structopt(long)]
    linear: bool,
    /// Decode every written image and compare it to the source pixels
    #[structopt(long)]
    verify: bool,
    /// Continue with the remaining files after a failure
    #[structopt(short, long)]
    keep_going: bool,
    /// More output (repeat for more)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
    /// Only print errors
    #[structopt(short, long)]
    quiet: bool,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => LevelFilter::Error,
            (false, 0) => LevelFilter::Info,
            (false, 1) => LevelFilter::Debug,
            (false, _) => LevelFilter::Trace,
        }
    }
}

fn main() -> Result<()> {
    let args = <Args as StructOpt>::from_args();
    TermLogger::init(args.log_level(), Config::default(), TerminalMode::Stderr, ColorChoice::Auto)?;

    ensure!(!args.paths.is_empty(), "no input paths given");
    let files = find_pngs(&args.paths)?;
    ensure!(!files.is_empty(), "no PNG files found in given paths");
    if let Some(dir) = &args.out_dir {
        fs::create_dir_all(dir)?;
    }

    let mut n_failed = 0;
    for file in &files {
        if let Err(err) = convert(file, &args) {
            let err = err.context(format!("failed to convert {}", file.display()));
            if !args.keep_going {
                return Err(err);
            }
            log::error!("{:#}", err);
            n_failed += 1;
        }
    }
    log::info!("converted {} of {} files", files.len() - n_failed, files.len());
    ensure!(n_failed == 0, "{} file(s) failed to convert", n_failed);
    Ok(())
}
