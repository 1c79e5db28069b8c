/// 可读可写的外设寄存器，所有访问都是 volatile 的
#[repr(transparent)]
pub struct Volatile<T: Copy>(T);

impl<T: Copy> Volatile<T> {
    pub fn read(&self) -> T {
        unsafe { core::ptr::read_volatile(&self.0) }
    }

    pub fn write(&mut self, value: T) {
        unsafe {
            core::ptr::write_volatile(&mut self.0, value);
        }
    }

    /// 读出、修改、写回
    pub fn update(&mut self, f: impl FnOnce(T) -> T) {
        let value = self.read();
        self.write(f(value));
    }
}
