//! Character diff using the Myers O(ND) difference algorithm.
//!
//! Common prefix and suffix are stripped first, containment of one side in the
//! other is answered directly, and everything else goes through the
//! middle-snake bisection. A final pass coalesces adjacent edits of the same
//! kind. Positions are counted in Unicode scalar values (`char`s).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Delete,
    Equal,
    Insert,
}

pub type Edit = (EditKind, String);

/// Compute the edit script turning `src` into `dst`.
pub fn diff(src: &str, dst: &str) -> Vec<Edit> {
    if src == dst {
        return if src.is_empty() {
            Vec::new()
        } else {
            vec![(EditKind::Equal, src.to_owned())]
        };
    }
    let a: Vec<char> = src.chars().collect();
    let b: Vec<char> = dst.chars().collect();
    let mut script = Vec::new();
    diff_chars(&a, &b, &mut script);
    coalesce(script)
}

// ── Script building ───────────────────────────────────────────────────────

fn push(out: &mut Vec<Edit>, kind: EditKind, chars: &[char]) {
    if chars.is_empty() {
        return;
    }
    match out.last_mut() {
        Some((last, text)) if *last == kind => text.extend(chars),
        _ => out.push((kind, chars.iter().collect())),
    }
}

fn push_str(out: &mut Vec<Edit>, kind: EditKind, text: &str) {
    if text.is_empty() {
        return;
    }
    match out.last_mut() {
        Some((last, existing)) if *last == kind => existing.push_str(text),
        _ => out.push((kind, text.to_owned())),
    }
}

fn common_prefix(a: &[char], b: &[char]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn common_suffix(a: &[char], b: &[char]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

fn find(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

// ── Core diff ─────────────────────────────────────────────────────────────

fn diff_chars(a: &[char], b: &[char], out: &mut Vec<Edit>) {
    let prefix = common_prefix(a, b);
    let (a_rest, b_rest) = (&a[prefix..], &b[prefix..]);
    let suffix = common_suffix(a_rest, b_rest);

    push(out, EditKind::Equal, &a[..prefix]);
    diff_middle(
        &a_rest[..a_rest.len() - suffix],
        &b_rest[..b_rest.len() - suffix],
        out,
    );
    push(out, EditKind::Equal, &a_rest[a_rest.len() - suffix..]);
}

/// Diff two slices that share no common prefix or suffix.
fn diff_middle(a: &[char], b: &[char], out: &mut Vec<Edit>) {
    if a.is_empty() {
        push(out, EditKind::Insert, b);
        return;
    }
    if b.is_empty() {
        push(out, EditKind::Delete, a);
        return;
    }

    let a_is_longer = a.len() > b.len();
    let (long, short) = if a_is_longer { (a, b) } else { (b, a) };
    if let Some(idx) = find(long, short) {
        let kind = if a_is_longer {
            EditKind::Delete
        } else {
            EditKind::Insert
        };
        push(out, kind, &long[..idx]);
        push(out, EditKind::Equal, short);
        push(out, kind, &long[idx + short.len()..]);
        return;
    }

    if short.len() == 1 {
        push(out, EditKind::Delete, a);
        push(out, EditKind::Insert, b);
        return;
    }

    bisect(a, b, out);
}

/// Find the middle snake and recurse on both halves.
fn bisect(a: &[char], b: &[char], out: &mut Vec<Edit>) {
    let n = a.len() as isize;
    let m = b.len() as isize;
    let max_d = (n + m + 1) / 2;
    let offset = max_d;
    let width = 2 * max_d as usize;

    let mut fwd = vec![-1isize; width];
    let mut rev = vec![-1isize; width];
    fwd[offset as usize + 1] = 0;
    rev[offset as usize + 1] = 0;

    let delta = n - m;
    // With an odd delta the forward path is the one that detects the overlap.
    let front = delta % 2 != 0;

    let (mut k1_start, mut k1_end, mut k2_start, mut k2_end) = (0isize, 0isize, 0isize, 0isize);

    for d in 0..max_d {
        let mut k1 = -d + k1_start;
        while k1 <= d - k1_end {
            let k1_off = (offset + k1) as usize;
            let mut x1 = if k1 == -d || (k1 != d && fwd[k1_off - 1] < fwd[k1_off + 1]) {
                fwd[k1_off + 1]
            } else {
                fwd[k1_off - 1] + 1
            };
            let mut y1 = x1 - k1;
            while x1 < n && y1 >= 0 && y1 < m && a[x1 as usize] == b[y1 as usize] {
                x1 += 1;
                y1 += 1;
            }
            fwd[k1_off] = x1;
            if x1 > n {
                k1_end += 2;
            } else if y1 > m {
                k1_start += 2;
            } else if front {
                let k2_off = offset + delta - k1;
                if k2_off >= 0 && (k2_off as usize) < width && rev[k2_off as usize] != -1 {
                    let x2 = n - rev[k2_off as usize];
                    if x1 >= x2 {
                        split(a, b, x1, y1, out);
                        return;
                    }
                }
            }
            k1 += 2;
        }

        let mut k2 = -d + k2_start;
        while k2 <= d - k2_end {
            let k2_off = (offset + k2) as usize;
            let mut x2 = if k2 == -d || (k2 != d && rev[k2_off - 1] < rev[k2_off + 1]) {
                rev[k2_off + 1]
            } else {
                rev[k2_off - 1] + 1
            };
            let mut y2 = x2 - k2;
            while x2 < n
                && y2 >= 0
                && y2 < m
                && a[(n - x2 - 1) as usize] == b[(m - y2 - 1) as usize]
            {
                x2 += 1;
                y2 += 1;
            }
            rev[k2_off] = x2;
            if x2 > n {
                k2_end += 2;
            } else if y2 > m {
                k2_start += 2;
            } else if !front {
                let k1_off = offset + delta - k2;
                if k1_off >= 0 && (k1_off as usize) < width && fwd[k1_off as usize] != -1 {
                    let x1 = fwd[k1_off as usize];
                    let y1 = offset + x1 - k1_off;
                    if x1 >= n - x2 {
                        split(a, b, x1, y1, out);
                        return;
                    }
                }
            }
            k2 += 2;
        }
    }

    push(out, EditKind::Delete, a);
    push(out, EditKind::Insert, b);
}

fn split(a: &[char], b: &[char], x: isize, y: isize, out: &mut Vec<Edit>) {
    let x = x.clamp(0, a.len() as isize) as usize;
    let y = y.clamp(0, b.len() as isize) as usize;
    // A degenerate split would recurse on the same input forever.
    if (x == 0 && y == 0) || (x == a.len() && y == b.len()) {
        push(out, EditKind::Delete, a);
        push(out, EditKind::Insert, b);
        return;
    }
    diff_chars(&a[..x], &b[..y], out);
    diff_chars(&a[x..], &b[y..], out);
}

// ── Coalescing ────────────────────────────────────────────────────────────

/// Merge every run of deletes and inserts between two equalities into at most
/// one delete followed by one insert, moving shared affixes into the
/// neighbouring equalities.
fn coalesce(script: Vec<Edit>) -> Vec<Edit> {
    let mut out: Vec<Edit> = Vec::with_capacity(script.len());
    let mut deleted = String::new();
    let mut inserted = String::new();
    for (kind, text) in script {
        match kind {
            EditKind::Delete => deleted.push_str(&text),
            EditKind::Insert => inserted.push_str(&text),
            EditKind::Equal => {
                flush(&mut out, &mut deleted, &mut inserted);
                push_str(&mut out, EditKind::Equal, &text);
            }
        }
    }
    flush(&mut out, &mut deleted, &mut inserted);
    out
}

fn flush(out: &mut Vec<Edit>, deleted: &mut String, inserted: &mut String) {
    if deleted.is_empty() && inserted.is_empty() {
        return;
    }
    let del: Vec<char> = deleted.chars().collect();
    let ins: Vec<char> = inserted.chars().collect();
    let prefix = common_prefix(&del, &ins);
    let suffix = common_suffix(&del[prefix..], &ins[prefix..]);

    push(out, EditKind::Equal, &del[..prefix]);
    push(out, EditKind::Delete, &del[prefix..del.len() - suffix]);
    push(out, EditKind::Insert, &ins[prefix..ins.len() - suffix]);
    push(out, EditKind::Equal, &del[del.len() - suffix..]);

    deleted.clear();
    inserted.clear();
}
