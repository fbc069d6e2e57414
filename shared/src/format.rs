/// 计数的紧凑显示（点赞、评论、浏览数）
///
/// 1000 以上显示 `1k`，10000 以上 `10k`，100000 以上 `100k`。
pub fn compact_count(n: u64) -> String {
    match n {
        100_000.. => "100k".to_string(),
        10_000.. => "10k".to_string(),
        1_000.. => "1k".to_string(),
        _ => n.to_string(),
    }
}

/// 按字符数（而非字节）截断，用于卡片标题
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_count_thresholds() {
        assert_eq!(compact_count(0), "0");
        assert_eq!(compact_count(999), "999");
        assert_eq!(compact_count(1_000), "1k");
        assert_eq!(compact_count(9_999), "1k");
        assert_eq!(compact_count(10_000), "10k");
        assert_eq!(compact_count(123_456), "100k");
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate_chars("안녕하세요", 5), "안녕하세요");
        assert_eq!(truncate_chars("안녕하세요", 2), "안녕…");
    }
}
