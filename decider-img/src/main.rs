mod block_file;
mod cli;

use std::fs::OpenOptions;
use std::io;

use block_dev::{BLOCK_SIZE, BlockDevice, BlockError};
use clap::Parser;
use decider_fat::{FileStore, VirtualDisk};
use decider_usb::{BootOption, Config, DeciderUsb, MassStorage, Sense};
use typed_bytesize::ByteSizeIec;

pub use self::{block_file::BlockFile, cli::Cli};

fn sense_error(lba: u32, sense: Sense) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, format!("block {lba}: {sense}"))
}

fn block_error(err: BlockError) -> io::Error {
    io::Error::other(err.to_string())
}

/// 像主机一样逐块读取逻辑单元，把非零块写进镜像。
/// 返回写入的块数。
fn dump(lun: &impl MassStorage, image: &impl BlockDevice) -> io::Result<usize> {
    let capacity = lun.capacity();
    let mut block = [0u8; BLOCK_SIZE];
    let mut written = 0;
    for lba in 0..capacity.block_count {
        lun.read10(lba, 0, &mut block)
            .map_err(|sense| sense_error(lba, sense))?;
        if block.iter().any(|&b| b != 0) {
            image.write_block(lba as usize, &block).map_err(block_error)?;
            written += 1;
        }
    }
    Ok(written)
}

/// 逐块比较两个设备
fn verify(expected: &dyn BlockDevice, actual: &dyn BlockDevice) -> io::Result<()> {
    if expected.block_count() != actual.block_count() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "image holds {} blocks, expected {}",
                actual.block_count(),
                expected.block_count()
            ),
        ));
    }

    let mut want = [0u8; BLOCK_SIZE];
    let mut got = [0u8; BLOCK_SIZE];
    for block_id in 0..expected.block_count() {
        expected.read_block(block_id, &mut want).map_err(block_error)?;
        actual.read_block(block_id, &mut got).map_err(block_error)?;
        if want != got {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("block {block_id} differs"),
            ));
        }
    }
    Ok(())
}

fn main() -> io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = Config {
        initial_boot_option: cli
            .choice_type
            .as_deref()
            .map(|choice_type| BootOption::new(choice_type, cli.entry_id.as_deref())),
    };

    let store = FileStore::new();
    let decider = DeciderUsb::new(&store, config);
    decider
        .setup()
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;
    decider.dump_config();

    let lun = decider.lun();
    // 主机挂载前会先清掉“介质已更换”
    while let Err(sense) = lun.test_unit_ready() {
        log::info!("unit attention: {sense}");
    }

    let inquiry = lun.inquiry();
    log::info!(
        "vendor={:?} product={:?} revision={:?}",
        String::from_utf8_lossy(&inquiry.vendor_id),
        String::from_utf8_lossy(&inquiry.product_id),
        String::from_utf8_lossy(&inquiry.product_rev),
    );

    let capacity = lun.capacity();
    let disk_size = ByteSizeIec(capacity.block_count as u64 * capacity.block_size as u64);
    log::info!(
        "capacity: {} blocks of {} bytes ({disk_size})",
        capacity.block_count,
        capacity.block_size
    );

    let path = cli.out_dir.join("decider.img");
    println!("image={path:?}");
    let fd = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(&path)?;
    fd.set_len(disk_size.0)?;

    let image = BlockFile::new(fd)?;
    let written = dump(&lun, &image)?;
    log::info!("wrote {written} non-empty blocks");

    if cli.verify {
        verify(&VirtualDisk::new(&store), &image)?;
        println!("verified {} blocks", image.block_count());
    }

    Ok(())
}
