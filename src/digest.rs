//! # Digest assembly
//! Buckets classified items per configured category. The Digest is the
//! terminal artifact of a run: rendering consumes it, nothing persists it.

use crate::categories::CategorySet;
use crate::classify::ClassifiedItem;

/// One category bucket with its items in classification order.
#[derive(Debug, Clone)]
pub struct Section {
    pub key: String,
    pub label: String,
    pub icon: String,
    pub items: Vec<ClassifiedItem>,
}

/// One section per configured category, in declared order. All sections
/// empty = "no news today".
#[derive(Debug, Clone)]
pub struct Digest {
    pub sections: Vec<Section>,
}

impl Digest {
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.items.is_empty())
    }

    pub fn total(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }
}

/// Append each item to its category's bucket, keeping classification order.
/// Items with a category no bucket exists for are dropped; the classifier
/// output is validated upstream, so this only fires on config skew.
pub fn assemble(classified: Vec<ClassifiedItem>, categories: &CategorySet) -> Digest {
    let mut sections: Vec<Section> = categories
        .iter()
        .map(|c| Section {
            key: c.key.clone(),
            label: c.label.clone(),
            icon: c.icon.clone(),
            items: Vec::new(),
        })
        .collect();

    for item in classified {
        match sections.iter_mut().find(|s| s.key == item.category) {
            Some(section) => section.items.push(item),
            None => {
                tracing::warn!(category = %item.category, "no bucket for category, dropping item");
            }
        }
    }

    Digest { sections }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::NewsItem;

    fn classified(url: &str, category: &str) -> ClassifiedItem {
        ClassifiedItem {
            item: NewsItem {
                title: url.to_string(),
                url: url.to_string(),
                source: "Test".into(),
                published_at: None,
                excerpt: String::new(),
            },
            category: category.to_string(),
            summary: "s".into(),
        }
    }

    #[test]
    fn buckets_follow_declared_order_and_items_keep_theirs() {
        let cats = CategorySet::embedded();
        let digest = assemble(
            vec![
                classified("https://x.com/1", "ai_wealthtech"),
                classified("https://x.com/2", "acquisitions_ma"),
                classified("https://x.com/3", "ai_wealthtech"),
            ],
            &cats,
        );
        let keys: Vec<&str> = digest.sections.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "acquisitions_ma",
                "breakaway_advisors",
                "funding_investment",
                "ai_wealthtech"
            ]
        );
        let ai = &digest.sections[3];
        assert_eq!(ai.items.len(), 2);
        assert_eq!(ai.items[0].item.url, "https://x.com/1");
        assert_eq!(ai.items[1].item.url, "https://x.com/3");
        assert_eq!(digest.total(), 3);
        assert!(!digest.is_empty());
    }

    #[test]
    fn every_bucketed_item_matches_its_bucket_key() {
        let cats = CategorySet::embedded();
        let digest = assemble(
            vec![
                classified("https://x.com/1", "funding_investment"),
                classified("https://x.com/2", "breakaway_advisors"),
            ],
            &cats,
        );
        for section in &digest.sections {
            assert!(section.items.iter().all(|i| i.category == section.key));
        }
    }

    #[test]
    fn unknown_category_never_lands_in_a_bucket() {
        let cats = CategorySet::embedded();
        let digest = assemble(vec![classified("https://x.com/1", "sports")], &cats);
        assert!(digest.is_empty());
        assert_eq!(digest.total(), 0);
    }

    #[test]
    fn no_items_is_the_no_news_state() {
        let digest = assemble(Vec::new(), &CategorySet::embedded());
        assert!(digest.is_empty());
        assert_eq!(digest.sections.len(), 4);
    }
}
