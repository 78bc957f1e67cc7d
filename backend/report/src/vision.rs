use std::fmt::{self, Write};

use cogforge_vision::image_analysis::ImagePoint;
use cogforge_vision::{DetectedFace, ImageAnalysisResult, ImagePrediction};

const SECTION_RULE_WIDTH: usize = 58;

fn polygon(points: &[ImagePoint]) -> String {
    let joined: Vec<String> = points.iter().map(ToString::to_string).collect();
    format!("[{}]", joined.join(", "))
}

fn section_end(out: &mut impl Write) -> fmt::Result {
    writeln!(out, "{}", "=".repeat(SECTION_RULE_WIDTH))
}

pub(crate) fn image_analysis(out: &mut impl Write, result: &ImageAnalysisResult) -> fmt::Result {
    writeln!(out, "Image analysis results:")?;
    writeln!(
        out,
        " Metadata: Model: {} Image dimensions: {} x {}",
        result.model_version, result.metadata.width, result.metadata.height
    )?;

    if let Some(caption) = &result.caption_result {
        writeln!(out, " Caption:")?;
        writeln!(out, "   '{}', Confidence {:.4}", caption.text, caption.confidence)?;
        section_end(out)?;
    }

    if let Some(dense) = &result.dense_captions_result {
        writeln!(out, " Dense Captions:")?;
        if dense.values.is_empty() {
            writeln!(out, "   No dense captions detected.")?;
        }
        for caption in &dense.values {
            writeln!(
                out,
                "   Region: '{}', Confidence {:.4}, Bounding box {}",
                caption.text, caption.confidence, caption.bounding_box
            )?;
        }
        section_end(out)?;
    }

    if let Some(objects) = &result.objects_result {
        writeln!(out, " Objects:")?;
        if objects.values.is_empty() {
            writeln!(out, "   No objects detected.")?;
        }
        for object in &objects.values {
            let tag = object.tags.first().map(|t| t.name.as_str()).unwrap_or("unknown");
            writeln!(out, "   Object: '{tag}', Bounding box {}", object.bounding_box)?;
        }
        section_end(out)?;
    }

    if let Some(people) = &result.people_result {
        writeln!(out, " People:")?;
        if people.values.is_empty() {
            writeln!(out, "   No people detected.")?;
        }
        for person in &people.values {
            writeln!(
                out,
                "   Person: Bounding box {}, Confidence {:.4}",
                person.bounding_box, person.confidence
            )?;
        }
        section_end(out)?;
    }

    if let Some(read) = &result.read_result {
        writeln!(out, " Read:")?;
        let mut any = false;
        for line in read.lines() {
            any = true;
            writeln!(
                out,
                "   Line: '{}', Bounding Polygon: {}",
                line.text,
                polygon(&line.bounding_polygon)
            )?;
            for word in &line.words {
                writeln!(
                    out,
                    "     Word: '{}', Confidence {:.4}, Bounding Polygon: {}",
                    word.text,
                    word.confidence,
                    polygon(&word.bounding_polygon)
                )?;
            }
        }
        if !any {
            writeln!(out, "   No text detected.")?;
        }
        section_end(out)?;
    }

    if let Some(crops) = &result.smart_crops_result {
        writeln!(out, " SmartCrops:")?;
        if crops.values.is_empty() {
            writeln!(out, "   No smart crops available.")?;
        }
        for crop in &crops.values {
            writeln!(
                out,
                "   Aspect ratio: {}, Bounding box: {}",
                crop.aspect_ratio, crop.bounding_box
            )?;
        }
        section_end(out)?;
    }

    if let Some(tags) = &result.tags_result {
        writeln!(out, " Tags:")?;
        if tags.values.is_empty() {
            writeln!(out, "   No tags detected.")?;
        }
        for tag in &tags.values {
            writeln!(out, "   '{}', Confidence {:.4}", tag.name, tag.confidence)?;
        }
        section_end(out)?;
    }
    Ok(())
}

pub(crate) fn faces(out: &mut impl Write, faces: &[DetectedFace]) -> fmt::Result {
    writeln!(out, "Detected {} face(s) in the image.", faces.len())?;
    for (i, face) in faces.iter().enumerate() {
        let rect = face.face_rectangle;
        writeln!(out, "Face {}:", i + 1)?;
        writeln!(
            out,
            "  Face Rectangle: left={}, top={}, width={}, height={}",
            rect.left, rect.top, rect.width, rect.height
        )?;
        if let Some(attributes) = &face.face_attributes {
            if let Some(pose) = attributes.head_pose {
                writeln!(
                    out,
                    "  Head pose: pitch={}, roll={}, yaw={}",
                    pose.pitch, pose.roll, pose.yaw
                )?;
            }
            if let Some(mask) = &attributes.mask {
                writeln!(
                    out,
                    "  Mask: NoseAndMouthCovered={}, Type={}",
                    mask.nose_and_mouth_covered, mask.mask_type
                )?;
            }
            if let Some(quality) = &attributes.quality_for_recognition {
                writeln!(out, "  Quality: {quality}")?;
            }
        }
        if let Some(model) = &face.recognition_model {
            writeln!(out, "  Recognition model: {model}")?;
        }
        writeln!(out, "  Landmarks:")?;
        for (name, point) in face.ordered_landmarks() {
            if let Some(point) = point {
                writeln!(out, "    {name}: ({}, {})", point.x, point.y)?;
            }
        }
    }
    Ok(())
}

pub(crate) fn predictions(
    out: &mut impl Write,
    prediction: &ImagePrediction,
    detection: bool,
) -> fmt::Result {
    writeln!(out, "Predictions:")?;
    if prediction.predictions.is_empty() {
        return writeln!(out, "\tNo predictions returned.");
    }
    for p in &prediction.predictions {
        write!(out, "\t{}: {:.1}%", p.tag_name, p.probability * 100.0)?;
        match (detection, p.bounding_box) {
            (true, Some(b)) => writeln!(
                out,
                " [ {}, {}, {}, {} ]",
                b.left, b.top, b.width, b.height
            )?,
            _ => writeln!(out)?,
        }
    }
    Ok(())
}
