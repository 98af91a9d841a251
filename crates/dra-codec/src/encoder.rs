//! DRA 编码会话.
//!
//! 会话持有一个帧编码器和会话码流. 每帧在帧内写入器中编码完成后,
//! 才按字对齐拼接到会话码流, 因此失败的帧不会留下任何位.
//! 每帧在码流中恰好占用帧头声明的字数.

use log::{debug, info};
use rayon::prelude::*;

use dra_core::DraResult;
use dra_core::bitwriter::BitWriter;

use crate::frame_config::FrameConfig;
use crate::frame_encoder::{EncodedFrame, FrameEncoder, FrameReport};
use crate::resources::CodecResources;

/// DRA 编码会话
pub struct DraEncoder<'a> {
    frame_encoder: FrameEncoder<'a>,
    /// 会话码流
    stream: BitWriter,
    /// 已编码帧数
    frames: usize,
}

impl<'a> DraEncoder<'a> {
    /// 创建编码会话
    pub fn new(resources: &'a CodecResources, config: FrameConfig) -> DraResult<Self> {
        let frame_encoder = FrameEncoder::new(resources, config)?;
        Ok(Self {
            frame_encoder,
            stream: BitWriter::new(),
            frames: 0,
        })
    }

    /// 帧编码器
    pub fn frame_encoder(&self) -> &FrameEncoder<'a> {
        &self.frame_encoder
    }

    /// 编码一帧并追加到会话码流
    pub fn encode_frame(&mut self, coefficients: &[f64]) -> DraResult<FrameReport> {
        let frame = self.frame_encoder.encode_frame(coefficients)?;
        Ok(self.push_frame(frame))
    }

    /// 并行编码多帧, 按输入顺序追加到会话码流
    ///
    /// 输出与逐帧调用 [`encode_frame`](Self::encode_frame) 逐位相同.
    /// 任何一帧失败时会话码流保持不变.
    pub fn encode_all_parallel<F>(&mut self, frames: &[F]) -> DraResult<Vec<FrameReport>>
    where
        F: AsRef<[f64]> + Sync,
    {
        let encoder = &self.frame_encoder;
        let encoded = frames
            .par_iter()
            .map(|f| encoder.encode_frame(f.as_ref()))
            .collect::<DraResult<Vec<_>>>()?;

        debug!("并行编码 {} 帧", encoded.len());
        Ok(encoded.into_iter().map(|f| self.push_frame(f)).collect())
    }

    fn push_frame(&mut self, frame: EncodedFrame) -> FrameReport {
        self.stream.append(&frame.writer);
        self.stream.align_to_word();
        self.frames += 1;
        frame.report
    }

    /// 已编码帧数
    pub fn frames_encoded(&self) -> usize {
        self.frames
    }

    /// 会话码流已写入的位数
    pub fn bits_written(&self) -> usize {
        self.stream.bits_written()
    }

    /// 结束会话, 返回字序列
    pub fn finish(self) -> Vec<u32> {
        info!(
            "编码会话结束: {} 帧, {} 字",
            self.frames,
            self.stream.bits_written().div_ceil(32)
        );
        self.stream.finish()
    }
}

/// 逐帧编码全部帧, 返回会话字序列
pub fn encode_frames<F: AsRef<[f64]>>(
    resources: &CodecResources,
    config: FrameConfig,
    frames: &[F],
) -> DraResult<Vec<u32>> {
    let mut encoder = DraEncoder::new(resources, config)?;
    for f in frames {
        encoder.encode_frame(f.as_ref())?;
    }
    Ok(encoder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_config::{SampleRateIndex, StepSelection};
    use dra_core::DraError;

    fn test_frames(n: usize) -> Vec<Vec<f64>> {
        (0..n)
            .map(|f| {
                (0..1024)
                    .map(|i| ((i * (f + 3)) as f64 * 0.01).cos() * (50.0 + 40.0 * f as f64))
                    .collect()
            })
            .collect()
    }

    fn config() -> FrameConfig {
        FrameConfig::mono(SampleRateIndex::default())
            .with_band_edges(vec![32, 96, 256])
            .with_steps(StepSelection::Uniform(4))
    }

    #[test]
    fn test_并行与顺序一致() {
        let res = CodecResources::standard();
        let frames = test_frames(6);

        let sequential = encode_frames(&res, config(), &frames).unwrap();

        let mut enc = DraEncoder::new(&res, config()).unwrap();
        let reports = enc.encode_all_parallel(&frames).unwrap();
        assert_eq!(enc.frames_encoded(), 6);
        let parallel = enc.finish();

        assert_eq!(parallel, sequential);
        let total: usize = reports.iter().map(|r| r.num_words).sum();
        assert_eq!(parallel.len(), total);
    }

    #[test]
    fn test_失败帧不影响码流() {
        let res = CodecResources::standard();
        let mut enc = DraEncoder::new(&res, config()).unwrap();
        enc.encode_frame(&test_frames(1)[0]).unwrap();
        let bits = enc.bits_written();

        let mut bad = vec![0.0; 1024];
        bad[3] = f64::INFINITY;
        assert!(matches!(enc.encode_frame(&bad), Err(DraError::InvalidArgument(_))));
        assert!(enc.encode_all_parallel(&[vec![0.0; 1024], bad]).is_err());

        assert_eq!(enc.bits_written(), bits);
        assert_eq!(enc.frames_encoded(), 1);
    }

    #[test]
    fn test_帧按字对齐() {
        let res = CodecResources::standard();
        let mut enc = DraEncoder::new(&res, config()).unwrap();
        let a = enc.encode_frame(&test_frames(1)[0]).unwrap();
        assert_eq!(enc.bits_written(), a.num_words * 32);
        let b = enc.encode_frame(&[0.0; 1024]).unwrap();
        assert_eq!(enc.bits_written(), (a.num_words + b.num_words) * 32);
    }
}
