//! 进入 ROM 下载模式的厂商控制请求
//!
//! 主机发出一个无数据阶段的 OUT 请求。SETUP 阶段只做校验并排队状态阶段，
//! 真正的重启推迟到状态阶段完成（ACK）之后，否则主机会看到传输失败。

use core::sync::atomic::{AtomicBool, Ordering};

use usb_device::UsbDirection;
use usb_device::control::{Recipient, Request, RequestType};

use crate::config::{FLASH_MODE_INDEX, FLASH_MODE_REQUEST, FLASH_MODE_VALUE};
use crate::reboot::DownloadMode;

/// 协议栈回调时所处的控制传输阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlStage {
    Setup,
    Data,
    Ack,
}

/// 回调的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// 不是本模块的请求，交给其它处理者
    Unhandled,
    Handled,
    /// 应当以 STALL 应答
    Stall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    Idle,
    /// 已接受 SETUP，等待状态阶段完成
    Armed,
}

/// 由协议栈提供，用于为零长度请求排队状态阶段
pub trait StatusStage {
    /// 成功排队时返回`true`
    fn queue_status(&mut self, request: &Request) -> bool;
}

/// 请求的七个字段必须全部匹配
pub fn is_flash_mode_request(request: &Request) -> bool {
    request.direction == UsbDirection::Out
        && request.request_type == RequestType::Vendor
        && request.recipient == Recipient::Device
        && request.request == FLASH_MODE_REQUEST
        && request.value == FLASH_MODE_VALUE
        && request.index == FLASH_MODE_INDEX
        && request.length == 0
}

/// 两阶段握手
///
/// 状态只有一个原子标志，SETUP 与 ACK 可能在不同的上下文中被调用。
pub struct FlashModeHandshake {
    armed: AtomicBool,
}

impl FlashModeHandshake {
    pub const fn new() -> Self {
        Self {
            armed: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> HandshakeState {
        if self.armed.load(Ordering::Acquire) {
            HandshakeState::Armed
        } else {
            HandshakeState::Idle
        }
    }

    pub fn on_control_transfer(
        &self,
        stage: ControlStage,
        request: &Request,
        status: &mut impl StatusStage,
        download: &impl DownloadMode,
    ) -> Disposition {
        if !is_flash_mode_request(request) {
            return Disposition::Unhandled;
        }

        match stage {
            ControlStage::Setup => {
                // 新的 SETUP 作废之前未完成的握手
                self.armed.store(false, Ordering::Release);
                if status.queue_status(request) {
                    self.armed.store(true, Ordering::Release);
                    log::debug!("flash mode request armed, waiting for status stage");
                    Disposition::Handled
                } else {
                    log::error!("failed to queue status stage for flash mode request");
                    Disposition::Stall
                }
            }
            ControlStage::Data => Disposition::Handled,
            ControlStage::Ack => {
                if self.armed.swap(false, Ordering::AcqRel) {
                    download.enter("Vendor control flash request");
                }
                Disposition::Handled
            }
        }
    }
}

impl Default for FlashModeHandshake {
    fn default() -> Self {
        Self::new()
    }
}
