use crate::links::contains_link;
use crate::models::CandidateItem;

/// Maps a free-text ranking back onto the inputs.
///
/// Returns input indices in ranked order, each at most once. Only lines that
/// carry a link token are considered; on such a line the unmatched input whose
/// link occurs in the line wins, the longest link first so `http://a.com` does
/// not steal a line meant for `http://a.com/post`. An empty result means the
/// response could not be mapped.
pub fn match_ranking(response: &str, items: &[CandidateItem]) -> Vec<usize> {
    let mut matched = vec![false; items.len()];
    let mut order = Vec::new();

    for line in response.lines().filter(|l| contains_link(l)) {
        let best = items
            .iter()
            .enumerate()
            .filter(|(i, item)| {
                !matched[*i] && !item.link.is_empty() && line.contains(item.link.as_str())
            })
            .max_by(|(ia, a), (ib, b)| a.link.len().cmp(&b.link.len()).then(ib.cmp(ia)));

        if let Some((i, _)) = best {
            matched[i] = true;
            order.push(i);
        }
    }

    order
}
