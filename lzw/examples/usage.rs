use anyhow::Result;
use gifenc_lzw::{
    block::{blockify, deblockify},
    encoder::{GifStyleEncoder, LzwEncoder},
};

fn main() -> Result<()> {
    // A 16 by 16 checkerboard of 4 colors.
    let pixels: Vec<u8> = (0..256u32)
        .map(|i| (((i % 16) / 4 + (i / 64)) % 4) as u8)
        .collect();

    let stream = LzwEncoder::new(2)?.encode(&pixels)?;
    println!(
        "{} pixels into {} codes, {} clear codes",
        pixels.len(),
        stream.len(),
        stream.clear_count()
    );

    let packed = GifStyleEncoder::encode_to_vec(&pixels, 2)?;
    let blocks = blockify(&packed);
    println!("{} packed bytes, {} with sub-blocks", packed.len(), blocks.len());

    assert_eq!(deblockify(&blocks)?, packed);

    let decoded = weezl::decode::Decoder::new(weezl::BitOrder::Lsb, 2).decode(&packed)?;
    assert_eq!(decoded, pixels);

    Ok(())
}
