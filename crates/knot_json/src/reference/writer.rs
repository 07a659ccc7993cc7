use alloc::string::{String, ToString};

use crate::hash::HashMap;
use crate::reference::ReferenceKey;

/// Ids handed out during one serialize call, starting at `"1"`.
#[derive(Default)]
pub(crate) struct ReferenceWriter {
    ids: HashMap<ReferenceKey, String>,
    next: u64,
}

impl ReferenceWriter {
    #[inline]
    pub fn get(&self, key: &ReferenceKey) -> Option<&str> {
        self.ids.get(key).map(String::as_str)
    }

    pub fn assign(&mut self, key: ReferenceKey) -> String {
        self.next += 1;
        let id = self.next.to_string();
        self.ids.insert(key, id.clone());
        id
    }
}

#[cfg(test)]
mod tests {
    use super::ReferenceWriter;
    use crate::reference::ReferenceKey;

    #[test]
    fn sequential_ids() {
        let mut writer = ReferenceWriter::default();
        assert_eq!(writer.assign(ReferenceKey::Address(10)), "1");
        assert_eq!(writer.assign(ReferenceKey::Address(20)), "2");
        assert_eq!(writer.get(&ReferenceKey::Address(10)), Some("1"));
        assert_eq!(writer.get(&ReferenceKey::Address(30)), None);
    }
}
