//! 只读的 USB 大容量存储设备，向主机提供`DECIDER.CHO`文件，
//! 并接受一个进入 ROM 下载模式的厂商控制请求。

#![no_std]

extern crate alloc;

pub mod boot_option;
pub mod config;
mod ptr;
pub mod reboot;
pub mod scsi;
pub mod vendor;

use decider_fat::FileStore;
use decider_fat::layout::FILE_MAX_SIZE;

pub use self::{
    boot_option::{BootOption, BootOptionError},
    config::Config,
    reboot::{DownloadMode, RtcDownloadMode},
    scsi::{DeciderLun, MassStorage, Sense},
    vendor::{ControlStage, Disposition, FlashModeHandshake, StatusStage},
};

/// 固件中唯一的文件存储
pub static FILE_STORE: FileStore = FileStore::new();

/// 固件中唯一的下载模式握手
pub static FLASH_MODE: FlashModeHandshake = FlashModeHandshake::new();

/// 组件的对外接口
pub struct DeciderUsb<'a> {
    store: &'a FileStore,
    config: Config,
}

impl DeciderUsb<'static> {
    /// 使用全局的[`FILE_STORE`]
    pub fn global(config: Config) -> Self {
        Self::new(&FILE_STORE, config)
    }
}

impl<'a> DeciderUsb<'a> {
    pub fn new(store: &'a FileStore, config: Config) -> Self {
        Self { store, config }
    }

    /// 写入初始的引导选项，在协议栈启动前调用
    pub fn setup(&self) -> Result<(), BootOptionError> {
        if let Some(option) = &self.config.initial_boot_option {
            self.apply(option)?;
        }
        Ok(())
    }

    pub fn dump_config(&self) {
        log::info!("DeciderUsb:");
        log::info!("  File: DECIDER.CHO ({} bytes)", self.store.size());
        log::info!("  Max size: {FILE_MAX_SIZE} bytes");
        match &self.config.initial_boot_option {
            Some(option) => log::info!("  Initial choice_type: {}", option.choice_type),
            None => log::info!("  Initial choice_type: <none>"),
        }
    }

    /// 替换文件内容，并通知主机介质已更换。
    /// 被拒绝时原有内容保持不变。
    pub fn set_boot_option(
        &self,
        choice_type: &str,
        entry_id: Option<&str>,
    ) -> Result<(), BootOptionError> {
        self.apply(&BootOption::new(choice_type, entry_id))
    }

    pub fn apply(&self, option: &BootOption) -> Result<(), BootOptionError> {
        let content = option.render().inspect_err(|err| {
            log::error!("Rejected boot option '{}': {err}", option.choice_type);
        })?;

        self.store.set(content.as_bytes());
        self.store.signal_changed();
        log::info!(
            "Updated DECIDER.CHO ({} bytes): choice_type={}",
            content.len(),
            option.choice_type
        );
        Ok(())
    }

    /// 交给协议栈的逻辑单元
    pub fn lun(&self) -> DeciderLun<'a> {
        DeciderLun::new(self.store)
    }

    pub fn store(&self) -> &'a FileStore {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn content(store: &FileStore) -> alloc::vec::Vec<u8> {
        let mut buf = vec![0; store.size() as usize];
        store.copy_range(&mut buf, 0, FILE_MAX_SIZE as u32);
        buf
    }

    #[test]
    fn update_signals_media_change() {
        let store = FileStore::new();
        let decider = DeciderUsb::new(&store, Config::default());

        decider.set_boot_option("wifi", None).unwrap();
        assert_eq!(b"choice_type=wifi\n".as_slice(), content(&store));
        assert!(store.consume_changed());
    }

    #[test]
    fn rejected_update_keeps_old_content() {
        let store = FileStore::new();
        let decider = DeciderUsb::new(&store, Config::default());
        decider.set_boot_option("wifi", None).unwrap();
        assert!(store.consume_changed());

        assert_eq!(
            Err(BootOptionError::MissingEntryId),
            decider.set_boot_option("entry_id", None)
        );
        let long = "x".repeat(FILE_MAX_SIZE);
        assert!(decider.set_boot_option(&long, None).is_err());

        assert_eq!(b"choice_type=wifi\n".as_slice(), content(&store));
        assert!(!store.consume_changed());
    }

    #[test]
    fn setup_applies_initial_option() {
        let store = FileStore::new();
        let config = Config {
            initial_boot_option: Some(BootOption::new("entry_id", Some("backup-42"))),
        };
        let decider = DeciderUsb::new(&store, config);
        assert_eq!(0, store.size());

        decider.setup().unwrap();
        assert_eq!(
            b"choice_type=entry_id\nentry_id=backup-42\n".as_slice(),
            content(&store)
        );
        decider.dump_config();
    }

    #[test]
    fn setup_without_initial_option() {
        let store = FileStore::new();
        let decider = DeciderUsb::new(&store, Config::default());
        decider.setup().unwrap();
        assert_eq!(0, store.size());
        assert!(!store.consume_changed());
    }
}
