//! dra-cli - DRA 帧打包命令行工具
//!
//! 读取频域系数文件, 按会话配置编码为 DRA 码流.

mod config;
mod io;
mod logging;

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use log::{debug, info};

use dra_codec::{CodecResources, DraEncoder, FrameReport};

use config::{SessionConfig, StepConfig};

#[derive(Parser, Debug)]
#[command(name = "dra-cli", version, about = "DRA 帧打包工具")]
struct Cli {
    /// 输入系数文件 (小端 f32)
    #[arg(short, long)]
    input: PathBuf,

    /// 输出码流文件 (大端 32 位字)
    #[arg(short, long)]
    output: PathBuf,

    /// 会话配置文件 (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// 采样率 (Hz), 覆盖配置文件
    #[arg(long)]
    sample_rate: Option<u32>,

    /// 统一步长索引, 覆盖配置文件
    #[arg(long)]
    step_index: Option<u8>,

    /// 多线程并行编码
    #[arg(long)]
    parallel: bool,

    /// 日志级别 (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = logging::init("dra-cli", cli.verbose) {
        eprintln!("警告: {e:#}");
    }

    if let Err(e) = run(&cli) {
        eprintln!("错误: {e:#}");
        process::exit(1);
    }
}

fn session_config(cli: &Cli) -> anyhow::Result<SessionConfig> {
    let mut session = match &cli.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    if let Some(hz) = cli.sample_rate {
        session.sample_rate = hz;
    }
    if let Some(index) = cli.step_index {
        session.steps = StepConfig::Uniform { index };
    }
    Ok(session)
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let session = session_config(cli)?;
    debug!("会话配置: {:?}", session);

    let resources = CodecResources::standard();
    let mut encoder = DraEncoder::new(&resources, session.to_frame_config()?)
        .context("创建编码会话失败")?;

    let bins = encoder.frame_encoder().num_bins();
    let frames = io::read_frames(&cli.input, bins)?;
    info!("{}: {} 帧, 每帧 {} 个频点", cli.input.display(), frames.len(), bins);

    let reports = if cli.parallel {
        encoder.encode_all_parallel(&frames).context("并行编码失败")?
    } else {
        let mut reports = Vec::with_capacity(frames.len());
        for (i, frame) in frames.iter().enumerate() {
            let report = encoder
                .encode_frame(frame)
                .with_context(|| format!("第 {} 帧编码失败", i))?;
            reports.push(report);
        }
        reports
    };

    let words = encoder.finish();
    io::write_words(&cli.output, &words)?;

    print_summary(&reports, words.len());
    Ok(())
}

fn print_summary(reports: &[FrameReport], total_words: usize) {
    let frames = reports.len();
    let bits: usize = reports.iter().map(|r| r.num_bits).sum();
    let escaped: usize = reports.iter().map(|r| r.escaped).sum();
    println!("帧数: {}", frames);
    println!("总字数: {} ({} 字节)", total_words, total_words * 4);
    if frames > 0 {
        println!("平均每帧: {:.1} 位", bits as f64 / frames as f64);
    }
    println!("转义系数: {}", escaped);
}
