//! 引导选项及其文本格式
//!
//! 文件内容是以换行结尾的`key=value`行：
//!
//! ```text
//! choice_type=wifi
//! ```
//!
//! 或者
//!
//! ```text
//! choice_type=entry_id
//! entry_id=backup-42
//! ```

use alloc::string::String;
use core::fmt::Write;

use decider_fat::layout::FILE_MAX_SIZE;
use derive_more::Display;

/// 需要额外给出`entry_id`的选项类型
pub const ENTRY_ID_CHOICE: &str = "entry_id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootOption {
    pub choice_type: String,
    /// 只在`choice_type`为[`ENTRY_ID_CHOICE`]时写入文件
    pub entry_id: Option<String>,
}

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum BootOptionError {
    #[display(fmt = "choice_type is 'entry_id' but entry_id was not provided")]
    MissingEntryId,
    #[display(fmt = "content too long ({} > {})", len, FILE_MAX_SIZE)]
    TooLong { len: usize },
}

impl BootOption {
    pub fn new(choice_type: &str, entry_id: Option<&str>) -> Self {
        Self {
            choice_type: choice_type.into(),
            entry_id: entry_id.map(Into::into),
        }
    }

    pub fn requires_entry_id(&self) -> bool {
        self.choice_type == ENTRY_ID_CHOICE
    }

    /// 生成文件内容，超出文件容量时报错
    pub fn render(&self) -> Result<String, BootOptionError> {
        let mut content = String::with_capacity(FILE_MAX_SIZE);
        // 写入String不会失败
        let _ = writeln!(content, "choice_type={}", self.choice_type);

        if self.requires_entry_id() {
            let entry_id = self
                .entry_id
                .as_deref()
                .ok_or(BootOptionError::MissingEntryId)?;
            let _ = writeln!(content, "entry_id={entry_id}");
        }

        if content.len() > FILE_MAX_SIZE {
            return Err(BootOptionError::TooLong { len: content.len() });
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn plain_choice() {
        let content = BootOption::new("wifi", None).render().unwrap();
        assert_eq!("choice_type=wifi\n", content);
        assert_eq!(17, content.len());
    }

    #[test]
    fn entry_id_choice() {
        let content = BootOption::new("entry_id", Some("backup-42")).render().unwrap();
        assert_eq!("choice_type=entry_id\nentry_id=backup-42\n", content);
    }

    #[test]
    fn entry_id_is_required() {
        assert_eq!(
            Err(BootOptionError::MissingEntryId),
            BootOption::new("entry_id", None).render()
        );
    }

    #[test]
    fn entry_id_ignored_for_other_choices() {
        let content = BootOption::new("usb", Some("ignored")).render().unwrap();
        assert_eq!("choice_type=usb\n", content);
    }

    #[test]
    fn too_long() {
        let id = "x".repeat(FILE_MAX_SIZE);
        let err = BootOption::new("entry_id", Some(&id)).render().unwrap_err();
        assert_eq!(BootOptionError::TooLong { len: 21 + 9 + FILE_MAX_SIZE + 1 }, err);
        assert_eq!("content too long (287 > 256)", err.to_string());

        // 恰好填满文件是允许的
        let id = "y".repeat(FILE_MAX_SIZE - 31);
        let content = BootOption::new("entry_id", Some(&id)).render().unwrap();
        assert_eq!(FILE_MAX_SIZE, content.len());
    }
}
