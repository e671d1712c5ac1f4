use std::env;
use std::path::Path;
use std::process::exit;

use capfile::{
    Block, Capture, CaptureCompression, PcapCapture, PcapNGCapture, PcapNGPacketBlock,
};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!(
            "Usage: {} [-r|-w] input file [output file (if -w is specified)]",
            args[0]
        );
        exit(1);
    }

    let code = match args[1].as_str() {
        "-r" => read(&args[2]),
        "-w" if args.len() >= 4 => write(&args[2], &args[3]),
        _ => 1,
    };
    exit(code);
}

fn read(path: &str) -> i32 {
    if !Path::new(path).is_file() {
        return 1;
    }

    // try pcap first, then pcapng
    let mut capture = PcapCapture::open(path, CaptureCompression::Autodetect, true, false);
    if capture.valid() {
        print_pcap(&mut capture);
        return 0;
    }

    let mut capture = PcapNGCapture::open(path, CaptureCompression::Autodetect, true, false);
    if capture.valid() {
        print_pcapng(&mut capture);
        return 0;
    }

    eprintln!("{}: not recognized as pcap or pcapng", path);
    1
}

fn write(input: &str, output: &str) -> i32 {
    if !Path::new(input).is_file() {
        return 1;
    }

    // re-emit the capture under a new path: copy, reopen writable, save
    if std::fs::copy(input, output).is_err() {
        return 1;
    }
    let mut capture = PcapCapture::open(output, CaptureCompression::Autodetect, false, true);
    if capture.valid() {
        return if capture.save() { 0 } else { 1 };
    }
    let mut capture = PcapNGCapture::open(output, CaptureCompression::Autodetect, false, true);
    if capture.valid() {
        return if capture.save() { 0 } else { 1 };
    }
    1
}

fn print_pcap(capture: &mut PcapCapture) {
    let header = capture.header();
    println!("format: pcap ({})", header.variant.name());
    println!("\tversion: {}", header.version());
    println!("\tbyte order swap: {}", header.byte_order_swap);
    println!("\tsnaplen: {}", header.snaplen);
    println!(
        "\tlink type: {} ({})",
        header.network.name(),
        header.network.0
    );
    println!("\tcompression: {}", capture.compression().name());
    println!("\tpackets: {}", capture.packet_count());
    for index in 0..capture.packet_count() {
        match capture.get_packet(index) {
            Some(packet) => println!(
                "\t\t#{}: {} bytes (orig {}){}",
                index,
                packet.caplen(),
                packet.origlen(),
                if packet.complete() { "" } else { ", truncated" }
            ),
            None => println!("\t\t#{}: <unreadable>", index),
        }
    }
}

fn print_pcapng(capture: &mut PcapNGCapture) {
    println!("format: pcapng");
    println!("\tcompression: {}", capture.compression().name());
    println!("\tsections: {}", capture.section_count());
    for snum in 0..capture.section_count() {
        {
            let section = &capture.sections()[snum];
            println!(
                "\tsection {}: version {}, {} blocks, {}-endian",
                snum,
                section.version(),
                section.block_count(),
                if section.big_endian() { "big" } else { "little" }
            );
        }
        let block_count = capture.sections()[snum].block_count();
        for bnum in 0..block_count {
            match capture.get_block(snum, bnum) {
                Some(block) => print_block(&block),
                None => println!("\t\t<unreadable block>"),
            }
        }
    }
}

fn print_block(block: &Block) {
    match block {
        Block::InterfaceDescription(idb) => {
            println!(
                "\t\tinterface_description: link type {} ({}), snaplen {}",
                idb.linktype.name(),
                idb.linktype.0,
                idb.snaplen
            );
        }
        Block::EnhancedPacket(epb) => {
            println!(
                "\t\tenhanced_packet: if {}, {} bytes (orig {})",
                epb.if_id,
                epb.packet_data().len(),
                epb.orig_len()
            );
        }
        Block::SimplePacket(spb) => {
            println!("\t\tsimple_packet: orig {} bytes", spb.orig_len());
        }
        other => println!("\t\t{} (type 0x{:08X})", other.name(), other.block_type()),
    }
}
