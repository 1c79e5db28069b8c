//! 唯一文件的内容
//!
//! 应用侧会随时替换内容，USB 协议栈侧则随时读取扇区（可能在中断中）。
//! 每个操作都是一个屏蔽中断的临界区，临界区内只做一次不超过
//! [`FILE_MAX_SIZE`]字节的拷贝，不调用任何其它组件。
//!
//! 临界区由`critical-section`的实现提供：固件上屏蔽中断，
//! 主机上是一把可重入的全局锁。

use core::cell::RefCell;
use core::fmt;

use critical_section::Mutex;

use crate::layout::FILE_MAX_SIZE;

pub struct FileStore {
    inner: Mutex<RefCell<FileState>>,
}

#[derive(Debug)]
struct FileState {
    /// 超出`size`的部分恒为0
    content: [u8; FILE_MAX_SIZE],
    size: u32,
    /// 内容被替换后置位，由第一次介质就绪检查取走
    media_changed: bool,
}

impl FileStore {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(FileState {
                content: [0; FILE_MAX_SIZE],
                size: 0,
                media_changed: false,
            })),
        }
    }

    /// 在临界区内独占访问文件状态
    fn exclusive_session<F, V>(&self, f: F) -> V
    where
        F: FnOnce(&mut FileState) -> V,
    {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }

    /// 整体替换文件内容，超出容量的部分直接截掉。
    ///
    /// 不会置位介质变更标志，由调用者随后调用[`FileStore::signal_changed`]。
    pub fn set(&self, content: &[u8]) {
        let len = content.len().min(FILE_MAX_SIZE);
        self.exclusive_session(|file| {
            file.content.fill(0);
            file.content[..len].copy_from_slice(&content[..len]);
            file.size = len as u32;
        });
    }

    pub fn size(&self) -> u32 {
        self.exclusive_session(|file| file.size)
    }

    /// 从`offset`开始，拷贝至多`max_len`字节到`dest`，返回实际拷贝量。
    ///
    /// `offset`不小于文件大小时什么也不拷贝。
    pub fn copy_range(&self, dest: &mut [u8], offset: u32, max_len: u32) -> u32 {
        self.exclusive_session(|file| {
            if offset >= file.size {
                return 0;
            }

            let available = file.size - offset;
            let copied = max_len.min(available).min(dest.len() as u32);
            let start = offset as usize;
            let end = start + copied as usize;
            dest[..copied as usize].copy_from_slice(&file.content[start..end]);
            copied
        })
    }

    pub fn signal_changed(&self) {
        self.exclusive_session(|file| file.media_changed = true);
    }

    /// 取走介质变更标志，每次变更至多返回一次`true`
    pub fn consume_changed(&self) -> bool {
        self.exclusive_session(|file| core::mem::replace(&mut file.media_changed, false))
    }
}

impl fmt::Debug for FileStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStore")
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}
