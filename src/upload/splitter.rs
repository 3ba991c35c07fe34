use bytes::Bytes;

/// 单个分片，只在传输期间存在
#[derive(Debug, Clone)]
pub struct Chunk {
    /// 0 起始的分片序号
    pub index: usize,
    pub bytes: Bytes,
}

/// 把字节负载切成固定大小的分片。
///
/// `Bytes` 的切片是零拷贝的，且没有隐藏的读取游标，
/// 重试时可以对同一负载重新切分。
#[derive(Debug, Clone)]
pub struct ChunkSplitter {
    payload: Bytes,
    chunk_size: usize,
}

impl ChunkSplitter {
    /// chunk_size 必须大于 0，由 `UploadSession::new` 保证
    pub fn new(payload: Bytes, chunk_size: usize) -> Self {
        debug_assert!(chunk_size > 0);
        Self { payload, chunk_size }
    }

    pub fn total_chunks(&self) -> usize {
        self.payload.len().div_ceil(self.chunk_size)
    }

    /// 第 index 片的字节范围 [index*chunk_size, min((index+1)*chunk_size, len))
    pub fn chunk(&self, index: usize) -> Option<Chunk> {
        let start = index.checked_mul(self.chunk_size)?;
        if start >= self.payload.len() {
            return None;
        }
        let end = std::cmp::min(start + self.chunk_size, self.payload.len());

        Some(Chunk {
            index,
            bytes: self.payload.slice(start..end),
        })
    }

    /// 按序号升序迭代所有分片，可以重复调用
    pub fn chunks(&self) -> impl Iterator<Item = Chunk> + '_ {
        (0..self.total_chunks()).filter_map(move |index| self.chunk(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: usize = 1024 * 1024;

    fn payload_of(len: usize) -> Bytes {
        let data: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
        Bytes::from(data)
    }

    #[test]
    fn test_round_trip() {
        // 拼回所有分片必须精确还原原始负载
        let payload = payload_of(2 * MIB + 512 * 1024);
        let splitter = ChunkSplitter::new(payload.clone(), MIB);

        let mut reassembled = Vec::new();
        for chunk in splitter.chunks() {
            reassembled.extend_from_slice(&chunk.bytes);
        }

        assert_eq!(reassembled.len(), payload.len());
        assert_eq!(Bytes::from(reassembled), payload);
    }

    #[test]
    fn test_chunk_sizes() {
        let splitter = ChunkSplitter::new(payload_of(2 * MIB + 512 * 1024), MIB);

        let sizes: Vec<usize> = splitter.chunks().map(|c| c.bytes.len()).collect();
        assert_eq!(sizes, vec![MIB, MIB, 512 * 1024]);
    }

    #[test]
    fn test_total_chunks_is_ceil() {
        assert_eq!(ChunkSplitter::new(payload_of(10), 3).total_chunks(), 4);
        assert_eq!(ChunkSplitter::new(payload_of(9), 3).total_chunks(), 3);
        assert_eq!(ChunkSplitter::new(payload_of(1), MIB).total_chunks(), 1);
        assert_eq!(ChunkSplitter::new(payload_of(MIB), MIB).total_chunks(), 1);
    }

    #[test]
    fn test_indices_contiguous_from_zero() {
        let splitter = ChunkSplitter::new(payload_of(10), 3);
        let indices: Vec<usize> = splitter.chunks().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_restartable() {
        // 第二次切分结果与第一次完全一致
        let splitter = ChunkSplitter::new(payload_of(MIB + 1), 4096);

        let first: Vec<Bytes> = splitter.chunks().map(|c| c.bytes).collect();
        let second: Vec<Bytes> = splitter.chunks().map(|c| c.bytes).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_out_of_range_index() {
        let splitter = ChunkSplitter::new(payload_of(10), 3);
        assert!(splitter.chunk(3).is_some());
        assert!(splitter.chunk(4).is_none());
    }
}
